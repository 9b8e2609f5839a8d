// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! The two-hook lifecycle contract shared by all managed test resources.
//!
//! A test harness calls [`TestResourceLifecycle::start()`] once before the
//! suite, injects the returned [`ConfigurationMapping`] into the system under
//! test, and calls [`TestResourceLifecycle::stop()`] during finalization.

use crate::error::Result;
use std::collections::HashMap;

/// Immutable key/value configuration produced by `start()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationMapping {
    entries: HashMap<String, String>,
}

impl ConfigurationMapping {
    /// Mapping with exactly one entry.
    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::with_capacity(1);
        entries.insert(key.into(), value.into());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hand the entries to a framework that wants a plain map.
    pub fn into_inner(self) -> HashMap<String, String> {
        self.entries
    }
}

/// Setup/teardown pair a test framework drives around a test run.
///
/// Implemented by [`ManagedBrokerResource`](crate::ManagedBrokerResource) and
/// [`KafkaTestResource`](crate::KafkaTestResource). Other external resources
/// (databases, caches) can implement it to plug into the same harness code.
pub trait TestResourceLifecycle {
    /// Bring the resource up and describe how to reach it.
    fn start(&self) -> Result<ConfigurationMapping>;

    /// Release the resource. Never fails observably.
    fn stop(&self);
}
