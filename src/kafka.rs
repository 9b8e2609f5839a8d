// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Process-wide Kafka fixture.
//!
//! One Kafka container per test process, shared by every test that asks for
//! it. The harness drives it through [`KafkaTestResource`]; test code that
//! sits outside the lifecycle hooks calls [`bootstrap_servers()`], which
//! starts the container on first use.
//!
//! ```rust,no_run
//! use broker_test_resource::{KafkaTestResource, TestResourceLifecycle};
//!
//! # fn example() -> broker_test_resource::Result<()> {
//! let mapping = KafkaTestResource.start()?;
//! let servers = broker_test_resource::kafka::bootstrap_servers()?;
//! assert_eq!(mapping.get("camel.component.kafka.brokers"), Some(servers.as_str()));
//! KafkaTestResource.stop();
//! # Ok(())
//! # }
//! ```

use crate::config::KafkaResourceConfig;
use crate::error::{ResourceError, Result};
use crate::lifecycle::{ConfigurationMapping, TestResourceLifecycle};
use crate::provider::KafkaContainerProvider;
use crate::resource::ManagedBrokerResource;
use std::sync::OnceLock;
use tracing::debug;

/// The shared resource type behind [`KafkaTestResource`].
pub type SharedKafkaResource = ManagedBrokerResource<KafkaContainerProvider>;

static SHARED: OnceLock<SharedKafkaResource> = OnceLock::new();

fn build(config: KafkaResourceConfig) -> SharedKafkaResource {
    let key = config.config_key.clone();
    ManagedBrokerResource::new(KafkaContainerProvider::new(config), key)
}

/// Configure the shared Kafka resource.
///
/// Must run before the first `start()` or [`bootstrap_servers()`] call in the
/// process; afterwards the resource exists and this returns a config error.
pub fn configure(config: KafkaResourceConfig) -> Result<()> {
    config.validate()?;
    SHARED.set(build(config)).map_err(|_| {
        ResourceError::Config("shared Kafka resource is already initialized".into())
    })?;
    debug!("Shared Kafka resource configured");
    Ok(())
}

/// The shared resource, created with default config if nobody configured it.
pub fn shared() -> &'static SharedKafkaResource {
    SHARED.get_or_init(|| build(KafkaResourceConfig::default()))
}

/// Bootstrap servers of the shared Kafka broker, starting it if needed.
pub fn bootstrap_servers() -> Result<String> {
    shared().connection_address()
}

/// Lifecycle hooks for the shared Kafka broker.
///
/// Always pair `start()` with `stop()`. The shared resource is a static and is
/// never dropped, so a container started without a matching `stop()` keeps
/// running after the test process exits. This includes one started lazily by
/// [`bootstrap_servers()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KafkaTestResource;

impl TestResourceLifecycle for KafkaTestResource {
    fn start(&self) -> Result<ConfigurationMapping> {
        shared().start()
    }

    fn stop(&self) {
        shared().stop()
    }
}
