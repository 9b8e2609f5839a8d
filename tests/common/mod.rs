// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Shared test utilities for lifecycle and property tests.
//!
//! This module provides:
//! - A recording mock `BrokerProvider`
//! - Failure injection for provisioning and teardown

pub mod mock_provider;

pub use mock_provider::*;
