// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Managed broker lifecycle.
//!
//! [`ManagedBrokerResource`] owns at most one provisioned broker and adapts
//! its start/stop lifecycle to the [`TestResourceLifecycle`] contract.
//!
//! # State Machine
//!
//! ```text
//! Uninitialized ──start()──► Starting ──provider ready──► Running ──stop()──► Stopped
//!       ▲                       │                                             │
//!       └──── provider error ───┘◄────────────── start() ─────────────────────┘
//! ```
//!
//! - A failed start leaves nothing behind: no handle, no address.
//! - A stopped handle is never reused. `start()` after `stop()` provisions a
//!   fresh broker, whose address may differ.
//! - After `stop()` the last address is still readable. It is stale and says
//!   nothing about liveness.
//!
//! # Concurrency
//!
//! The state, the handle and the address live behind one `Mutex` that is held
//! for the whole provisioning call. Concurrent `start()` or
//! `connection_address()` callers therefore wait for the first provisioning
//! to finish and then observe its outcome. `Starting` is never visible from
//! outside the lock.

use crate::error::{ResourceError, Result};
use crate::lifecycle::{ConfigurationMapping, TestResourceLifecycle};
use crate::metrics;
use crate::provider::{BrokerProvider, ProvisionedBroker};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Lifecycle state of the managed broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing provisioned yet, or the last attempt failed.
    Uninitialized,
    /// Provisioning in progress.
    Starting,
    /// Broker reachable at the stored address.
    Running,
    /// Broker torn down. The stored address is stale.
    Stopped,
}

impl ResourceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }

    pub(crate) fn as_gauge(&self) -> f64 {
        match self {
            Self::Uninitialized => 0.0,
            Self::Starting => 1.0,
            Self::Running => 2.0,
            Self::Stopped => 3.0,
        }
    }
}

impl std::fmt::Display for ResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Inner<H> {
    state: ResourceState,
    handle: Option<H>,
    /// Kept after stop; cleared on failed start.
    address: Option<String>,
}

/// Single-instance adapter between a [`BrokerProvider`] and a test harness.
///
/// # Example
///
/// ```rust
/// use broker_test_resource::{ManagedBrokerResource, TestResourceLifecycle};
/// use broker_test_resource::provider::ExternalBrokerProvider;
///
/// # fn example() -> broker_test_resource::Result<()> {
/// let provider = ExternalBrokerProvider::new("127.0.0.1:9092")?;
/// let resource = ManagedBrokerResource::new(provider, "camel.component.kafka.brokers");
///
/// let mapping = resource.start()?;
/// assert_eq!(mapping.get("camel.component.kafka.brokers"), Some("127.0.0.1:9092"));
/// assert_eq!(resource.connection_address()?, "127.0.0.1:9092");
///
/// resource.stop();
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct ManagedBrokerResource<P: BrokerProvider> {
    provider: P,
    config_key: String,
    inner: Mutex<Inner<P::Handle>>,
    provision_count: AtomicU64,
}

impl<P: BrokerProvider> ManagedBrokerResource<P> {
    /// Create an uninitialized resource. Nothing is provisioned yet.
    pub fn new(provider: P, config_key: impl Into<String>) -> Self {
        Self {
            provider,
            config_key: config_key.into(),
            inner: Mutex::new(Inner {
                state: ResourceState::Uninitialized,
                handle: None,
                address: None,
            }),
            provision_count: AtomicU64::new(0),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Key of the entry returned by [`start()`](Self::start).
    pub fn config_key(&self) -> &str {
        &self.config_key
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ResourceState {
        self.lock().state
    }

    /// How many brokers this resource has provisioned successfully.
    pub fn provision_count(&self) -> u64 {
        self.provision_count.load(Ordering::Acquire)
    }

    /// Bring the broker up (if needed) and return its configuration entry.
    ///
    /// Blocks until the provider reports the broker reachable. A second call
    /// while running returns the same address without provisioning again.
    pub fn start(&self) -> Result<ConfigurationMapping> {
        let mut inner = self.lock();
        let address = self.ensure_running(&mut inner)?;
        Ok(ConfigurationMapping::single(self.config_key.clone(), address))
    }

    /// The broker's bootstrap address.
    ///
    /// Starts the broker on demand if nothing was started yet. After
    /// [`stop()`](Self::stop) this returns the stale address.
    pub fn connection_address(&self) -> Result<String> {
        let mut inner = self.lock();
        if matches!(inner.state, ResourceState::Running | ResourceState::Stopped) {
            if let Some(address) = &inner.address {
                return Ok(address.clone());
            }
        }

        debug!(
            provider = %self.provider.name(),
            "Address requested before start; provisioning on demand"
        );
        self.ensure_running(&mut inner)
    }

    /// Tear the broker down, reporting cleanup failures.
    ///
    /// The state becomes `Stopped` even when cleanup fails; the handle has
    /// been consumed either way.
    pub fn try_stop(&self) -> Result<()> {
        let mut inner = self.lock();
        match inner.state {
            ResourceState::Running => {
                let handle = inner.handle.take();
                self.transition(&mut inner, ResourceState::Stopped);
                match handle {
                    Some(handle) => self.close(handle),
                    None => Ok(()),
                }
            }
            ResourceState::Stopped => {
                debug!(provider = %self.provider.name(), "Broker already stopped");
                Ok(())
            }
            ResourceState::Uninitialized | ResourceState::Starting => {
                debug!(provider = %self.provider.name(), "Stop before start; nothing to release");
                Ok(())
            }
        }
    }

    /// Tear the broker down. Cleanup failures are logged and swallowed so
    /// they cannot mask an earlier test failure.
    pub fn stop(&self) {
        if let Err(e) = self.try_stop() {
            warn!(
                provider = %self.provider.name(),
                error = %e,
                "Broker teardown failed; ignoring"
            );
        }
    }

    fn ensure_running(&self, inner: &mut Inner<P::Handle>) -> Result<String> {
        if let (ResourceState::Running, Some(address)) = (inner.state, inner.address.as_ref()) {
            debug!(
                provider = %self.provider.name(),
                bootstrap_servers = %address,
                "Broker already running"
            );
            return Ok(address.clone());
        }

        let previous = inner.state;
        self.transition(inner, ResourceState::Starting);
        info!(
            provider = %self.provider.name(),
            previous = %previous,
            "Provisioning broker"
        );

        let started = Instant::now();
        match self.provider.provision() {
            Ok(handle) => {
                let address = handle.bootstrap_servers().to_string();
                inner.handle = Some(handle);
                inner.address = Some(address.clone());
                self.provision_count.fetch_add(1, Ordering::AcqRel);
                self.transition(inner, ResourceState::Running);

                let elapsed = started.elapsed();
                metrics::record_provision(self.provider.name(), true, elapsed);
                info!(
                    provider = %self.provider.name(),
                    bootstrap_servers = %address,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Broker running"
                );
                Ok(address)
            }
            Err(e) => {
                inner.address = None;
                self.transition(inner, ResourceState::Uninitialized);

                let elapsed = started.elapsed();
                metrics::record_provision(self.provider.name(), false, elapsed);
                error!(
                    provider = %self.provider.name(),
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Broker provisioning failed"
                );
                Err(self.as_provisioning(e))
            }
        }
    }

    fn close(&self, handle: P::Handle) -> Result<()> {
        let address = handle.bootstrap_servers().to_string();
        match handle.close() {
            Ok(()) => {
                metrics::record_teardown(self.provider.name(), true);
                info!(
                    provider = %self.provider.name(),
                    bootstrap_servers = %address,
                    "Broker stopped"
                );
                Ok(())
            }
            Err(e) => {
                metrics::record_teardown(self.provider.name(), false);
                Err(self.as_teardown(e))
            }
        }
    }

    fn transition(&self, inner: &mut Inner<P::Handle>, to: ResourceState) {
        inner.state = to;
        metrics::set_resource_state(self.provider.name(), to);
    }

    fn as_provisioning(&self, e: ResourceError) -> ResourceError {
        match e {
            e @ ResourceError::Provisioning { .. } => e,
            other => ResourceError::provisioning(self.provider.name(), other),
        }
    }

    fn as_teardown(&self, e: ResourceError) -> ResourceError {
        match e {
            e @ ResourceError::Teardown { .. } => e,
            other => ResourceError::teardown(self.provider.name(), other),
        }
    }

    /// Lock the state, recovering from a provider that panicked mid-start.
    fn lock(&self) -> MutexGuard<'_, Inner<P::Handle>> {
        let mut guard = self.inner.lock().unwrap_or_else(|poisoned| {
            warn!(provider = %self.provider.name(), "Resource lock poisoned; recovering");
            self.inner.clear_poison();
            poisoned.into_inner()
        });
        if guard.state == ResourceState::Starting {
            guard.handle = None;
            guard.address = None;
            self.transition(&mut guard, ResourceState::Uninitialized);
        }
        guard
    }
}

impl<P: BrokerProvider> TestResourceLifecycle for ManagedBrokerResource<P> {
    fn start(&self) -> Result<ConfigurationMapping> {
        ManagedBrokerResource::start(self)
    }

    fn stop(&self) {
        ManagedBrokerResource::stop(self)
    }
}

impl<P: BrokerProvider> std::fmt::Debug for ManagedBrokerResource<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedBrokerResource")
            .field("provider", &self.provider.name())
            .field("config_key", &self.config_key)
            .field("provision_count", &self.provision_count())
            .finish_non_exhaustive()
    }
}
