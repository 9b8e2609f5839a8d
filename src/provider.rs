// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Broker provider integration traits.
//!
//! A [`BrokerProvider`] knows how to bring one broker up; the
//! [`ProvisionedBroker`] it hands back knows its bootstrap address and how to
//! tear itself down. [`ManagedBrokerResource`](crate::ManagedBrokerResource)
//! only talks to these two traits, which keeps it testable with mocks.
//!
//! # Implementations
//!
//! - [`KafkaContainerProvider`]: runs a Kafka container via `testcontainers`.
//! - [`ExternalBrokerProvider`]: points at a broker someone else manages.
//!
//! # Example
//!
//! ```rust,no_run
//! use broker_test_resource::provider::{BrokerProvider, ProvisionedBroker, KafkaContainerProvider};
//! use broker_test_resource::config::KafkaResourceConfig;
//!
//! # fn example() -> broker_test_resource::Result<()> {
//! let provider = KafkaContainerProvider::new(KafkaResourceConfig::default());
//! let broker = provider.provision()?;
//! println!("kafka at {}", broker.bootstrap_servers());
//! broker.close()?;
//! # Ok(())
//! # }
//! ```

use crate::config::KafkaResourceConfig;
use crate::error::{ResourceError, Result};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, ImageExt};
use testcontainers_modules::kafka::{Kafka, KAFKA_PORT};
use tracing::debug;

/// Something that can provision a broker on demand.
pub trait BrokerProvider: Send + Sync + 'static {
    /// Handle to a running broker.
    type Handle: ProvisionedBroker;

    /// Short name used in logs, metrics and errors.
    fn name(&self) -> &str;

    /// Start a broker and block until it is reachable.
    ///
    /// Any timeout is the provider's business.
    fn provision(&self) -> Result<Self::Handle>;
}

/// A running broker owned by exactly one resource.
pub trait ProvisionedBroker: Send + 'static {
    /// Bootstrap address, `host:port[,host:port...]`.
    fn bootstrap_servers(&self) -> &str;

    /// Stop the broker and release its resources.
    fn close(self) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Kafka container
// ═══════════════════════════════════════════════════════════════════════════════

const KAFKA_CONTAINER_PROVIDER: &str = "kafka-container";

/// Provisions a single-node Kafka broker in a container.
#[derive(Debug, Clone, Default)]
pub struct KafkaContainerProvider {
    config: KafkaResourceConfig,
}

impl KafkaContainerProvider {
    pub fn new(config: KafkaResourceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KafkaResourceConfig {
        &self.config
    }
}

/// A running Kafka container. Dropping it also removes the container.
pub struct KafkaContainer {
    container: Container<Kafka>,
    bootstrap_servers: String,
}

impl std::fmt::Debug for KafkaContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaContainer")
            .field("id", &self.container.id())
            .field("bootstrap_servers", &self.bootstrap_servers)
            .finish()
    }
}

impl BrokerProvider for KafkaContainerProvider {
    type Handle = KafkaContainer;

    fn name(&self) -> &str {
        KAFKA_CONTAINER_PROVIDER
    }

    fn provision(&self) -> Result<KafkaContainer> {
        let mut request = Kafka::default().with_startup_timeout(self.config.startup_timeout());
        if let Some(tag) = &self.config.image_tag {
            request = request.with_tag(tag.clone());
        }

        let container = request
            .start()
            .map_err(|e| ResourceError::provisioning(KAFKA_CONTAINER_PROVIDER, e))?;

        let host = container
            .get_host()
            .map_err(|e| ResourceError::provisioning(KAFKA_CONTAINER_PROVIDER, e))?;
        let port = container
            .get_host_port_ipv4(KAFKA_PORT)
            .map_err(|e| ResourceError::provisioning(KAFKA_CONTAINER_PROVIDER, e))?;

        let bootstrap_servers = format!("{}:{}", host, port);
        debug!(
            container_id = %container.id(),
            bootstrap_servers = %bootstrap_servers,
            "Kafka container ready"
        );

        Ok(KafkaContainer {
            container,
            bootstrap_servers,
        })
    }
}

impl ProvisionedBroker for KafkaContainer {
    fn bootstrap_servers(&self) -> &str {
        &self.bootstrap_servers
    }

    fn close(self) -> Result<()> {
        self.container
            .rm()
            .map_err(|e| ResourceError::teardown(KAFKA_CONTAINER_PROVIDER, e))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Externally managed broker
// ═══════════════════════════════════════════════════════════════════════════════

const EXTERNAL_PROVIDER: &str = "external";

/// Uses a broker that is already running. Teardown leaves it alone.
#[derive(Debug, Clone)]
pub struct ExternalBrokerProvider {
    bootstrap_servers: String,
}

impl ExternalBrokerProvider {
    /// Validate and wrap a `host:port[,host:port...]` list.
    pub fn new(bootstrap_servers: impl Into<String>) -> Result<Self> {
        let bootstrap_servers = bootstrap_servers.into();
        validate_bootstrap_servers(&bootstrap_servers)?;
        Ok(Self { bootstrap_servers })
    }
}

/// Handle to an externally managed broker.
#[derive(Debug, Clone)]
pub struct ExternalBroker {
    bootstrap_servers: String,
}

impl BrokerProvider for ExternalBrokerProvider {
    type Handle = ExternalBroker;

    fn name(&self) -> &str {
        EXTERNAL_PROVIDER
    }

    fn provision(&self) -> Result<ExternalBroker> {
        Ok(ExternalBroker {
            bootstrap_servers: self.bootstrap_servers.clone(),
        })
    }
}

impl ProvisionedBroker for ExternalBroker {
    fn bootstrap_servers(&self) -> &str {
        &self.bootstrap_servers
    }

    fn close(self) -> Result<()> {
        debug!(bootstrap_servers = %self.bootstrap_servers, "External broker left running");
        Ok(())
    }
}

/// Check a bootstrap list has the `host:port[,host:port...]` shape.
pub fn validate_bootstrap_servers(servers: &str) -> Result<()> {
    if servers.trim().is_empty() {
        return Err(ResourceError::Config("bootstrap servers must not be empty".into()));
    }

    for entry in servers.split(',') {
        let entry = entry.trim();
        let (host, port) = entry.rsplit_once(':').ok_or_else(|| {
            ResourceError::Config(format!("bootstrap entry '{}' is missing a port", entry))
        })?;
        if host.is_empty() {
            return Err(ResourceError::Config(format!(
                "bootstrap entry '{}' is missing a host",
                entry
            )));
        }
        match port.parse::<u16>() {
            Ok(p) if p > 0 => {}
            _ => {
                return Err(ResourceError::Config(format!(
                    "bootstrap entry '{}' has an invalid port",
                    entry
                )))
            }
        }
    }
    Ok(())
}
