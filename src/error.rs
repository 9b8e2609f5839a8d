// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error types for broker test resources.
//!
//! # Error Categories
//!
//! | Error Type | Fatal | Description |
//! |------------|-------|-------------|
//! | `Provisioning` | Yes | Broker never reached a reachable state |
//! | `Teardown` | No | Cleanup failed after the broker ran |
//! | `Config` | Yes | Configuration invalid or applied too late |
//!
//! `Teardown` errors are normally swallowed by
//! [`ManagedBrokerResource::stop()`](crate::ManagedBrokerResource::stop) so
//! they never mask the failure of the test that ran before them. Use
//! [`try_stop()`](crate::ManagedBrokerResource::try_stop) to observe them.

use thiserror::Error;

/// Result type alias for resource operations.
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Boxed provider-specific error kept as the `source` of a [`ResourceError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while managing an external broker.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The provider could not bring the broker to a reachable state.
    ///
    /// Container engine missing, image pull failure, startup timeout.
    /// No retry is performed; the dependent tests cannot run.
    #[error("Provisioning failed ({provider}): {message}")]
    Provisioning {
        provider: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Releasing the broker failed.
    #[error("Teardown failed ({provider}): {message}")]
    Teardown {
        provider: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Invalid or late configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResourceError {
    /// Create a provisioning error wrapping a provider error.
    pub fn provisioning<E>(provider: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Provisioning {
            provider: provider.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a provisioning error without source.
    pub fn provisioning_msg(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provisioning {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a teardown error wrapping a provider error.
    pub fn teardown<E>(provider: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Teardown {
            provider: provider.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a teardown error without source.
    pub fn teardown_msg(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Teardown {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Whether the dependent tests can still run after this error.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Provisioning { .. } => true,
            Self::Teardown { .. } => false,
            Self::Config(_) => true,
        }
    }

    /// Check if this is a provisioning failure.
    pub fn is_provisioning(&self) -> bool {
        matches!(self, Self::Provisioning { .. })
    }
}
