// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics for broker resource lifecycles.
//!
//! All metrics are prefixed with `broker_resource_`. The crate never installs
//! a recorder; without one these calls are no-ops.

use crate::resource::ResourceState;
use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Record the outcome and duration of a provisioning attempt.
pub fn record_provision(provider: &str, success: bool, elapsed: Duration) {
    let status = if success { "success" } else { "failure" };
    counter!("broker_resource_provisions_total", "provider" => provider.to_string(), "status" => status)
        .increment(1);
    histogram!("broker_resource_provision_duration_seconds", "provider" => provider.to_string())
        .record(elapsed.as_secs_f64());
}

/// Record the outcome of a teardown.
pub fn record_teardown(provider: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!("broker_resource_teardowns_total", "provider" => provider.to_string(), "status" => status)
        .increment(1);
}

/// Set the current lifecycle state gauge.
pub fn set_resource_state(provider: &str, state: ResourceState) {
    gauge!("broker_resource_state", "provider" => provider.to_string()).set(state.as_gauge());
}
