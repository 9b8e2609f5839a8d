// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Broker Test Resource
//!
//! Starts and stops an ephemeral Kafka broker around an integration test run
//! and tells the tests where to find it.
//!
//! ## Architecture
//!
//! ```text
//!  test harness ── start()/stop() ──┐
//!                                   ▼
//!                      ┌─────────────────────────┐   provision()   ┌──────────────────┐
//!                      │  ManagedBrokerResource  │───────────────►│  BrokerProvider  │
//!                      │  (state, handle, addr)  │◄───────────────│  (container/ext) │
//!                      └─────────────────────────┘   handle        └──────────────────┘
//!                                   ▲
//!  test code ── bootstrap_servers() ┘
//! ```
//!
//! - [`ManagedBrokerResource`] owns at most one broker and runs the
//!   `Uninitialized → Starting → Running → Stopped` lifecycle.
//! - [`BrokerProvider`] is what actually brings a broker up:
//!   a Kafka container, or an externally managed broker.
//! - [`kafka`] holds the process-wide instance and the static accessor.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use broker_test_resource::{KafkaTestResource, TestResourceLifecycle};
//!
//! let config = KafkaTestResource.start().expect("Kafka did not start");
//! let brokers = config.get("camel.component.kafka.brokers").unwrap();
//! // ... run tests against `brokers` ...
//! KafkaTestResource.stop();
//! ```

pub mod config;
pub mod error;
pub mod kafka;
pub mod lifecycle;
pub mod metrics;
pub mod provider;
pub mod resource;

// Re-exports for convenience
pub use config::{KafkaResourceConfig, KAFKA_BROKERS_KEY};
pub use error::{ResourceError, Result};
pub use kafka::{bootstrap_servers, KafkaTestResource};
pub use lifecycle::{ConfigurationMapping, TestResourceLifecycle};
pub use provider::{BrokerProvider, ExternalBrokerProvider, KafkaContainerProvider, ProvisionedBroker};
pub use resource::{ManagedBrokerResource, ResourceState};
