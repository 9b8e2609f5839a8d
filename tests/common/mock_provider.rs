// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Mock BrokerProvider for testing.
//!
//! Records provision/close calls and tracks how many brokers are alive at
//! once. Provisioning and teardown failures can be switched on at any time.
//!
//! # Example
//! ```rust,ignore
//! let mock = MockProvider::new();
//! let stats = mock.stats();
//! let resource = ManagedBrokerResource::new(mock, KAFKA_BROKERS_KEY);
//!
//! resource.start()?;
//! assert_eq!(stats.provisions(), 1);
//! ```

use broker_test_resource::{BrokerProvider, ProvisionedBroker, ResourceError, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counters shared between the mock, its brokers and the test.
#[derive(Debug, Default)]
pub struct MockStats {
    provisions: AtomicUsize,
    attempts: AtomicUsize,
    closes: AtomicUsize,
    live: AtomicUsize,
    max_live: AtomicUsize,
    fail_provision: AtomicBool,
    fail_close: AtomicBool,
}

impl MockStats {
    /// Successful provisions.
    pub fn provisions(&self) -> usize {
        self.provisions.load(Ordering::SeqCst)
    }

    /// All provision calls, including failed ones.
    #[allow(dead_code)] // Not every test binary uses this
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Brokers provisioned and not yet closed.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously live brokers seen.
    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn set_fail_provision(&self, fail: bool) {
        self.fail_provision.store(fail, Ordering::SeqCst);
    }

    #[allow(dead_code)] // Not every test binary uses this
    pub fn set_fail_close(&self, fail: bool) {
        self.fail_close.store(fail, Ordering::SeqCst);
    }
}

/// Provider handing out `127.0.0.1:9092`, `127.0.0.1:9093`, ...
#[derive(Clone, Default)]
pub struct MockProvider {
    stats: Arc<MockStats>,
    delay: Duration,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every provision fails, like a host with no container runtime.
    #[allow(dead_code)] // Not every test binary uses this
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.stats.set_fail_provision(true);
        mock
    }

    /// Sleep inside `provision()` to widen race windows.
    #[allow(dead_code)] // Not every test binary uses this
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn stats(&self) -> Arc<MockStats> {
        self.stats.clone()
    }
}

impl BrokerProvider for MockProvider {
    type Handle = MockBroker;

    fn name(&self) -> &str {
        "mock"
    }

    fn provision(&self) -> Result<MockBroker> {
        self.stats.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.stats.fail_provision.load(Ordering::SeqCst) {
            return Err(ResourceError::provisioning_msg(
                "mock",
                "no container runtime available",
            ));
        }

        let n = self.stats.provisions.fetch_add(1, Ordering::SeqCst);
        let live = self.stats.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_live.fetch_max(live, Ordering::SeqCst);

        Ok(MockBroker {
            address: format!("127.0.0.1:{}", 9092 + n),
            stats: self.stats.clone(),
        })
    }
}

/// Broker handed out by [`MockProvider`].
pub struct MockBroker {
    address: String,
    stats: Arc<MockStats>,
}

impl ProvisionedBroker for MockBroker {
    fn bootstrap_servers(&self) -> &str {
        &self.address
    }

    fn close(self) -> Result<()> {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        self.stats.live.fetch_sub(1, Ordering::SeqCst);
        if self.stats.fail_close.load(Ordering::SeqCst) {
            return Err(ResourceError::teardown_msg("mock", "container already removed"));
        }
        Ok(())
    }
}
