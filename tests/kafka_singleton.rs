// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! The shared Kafka resource is configured at most once per process.
//!
//! Lives in its own test binary so no other test touches the singleton first.

use broker_test_resource::{kafka, KafkaResourceConfig, ResourceError, ResourceState};

#[test]
fn configure_once_then_reject() {
    let config = KafkaResourceConfig {
        config_key: "quarkus.kafka.bootstrap-servers".into(),
        image_tag: Some("7.6.1".into()),
        ..KafkaResourceConfig::for_testing()
    };
    kafka::configure(config.clone()).expect("first configure succeeds");

    let shared = kafka::shared();
    assert_eq!(shared.config_key(), "quarkus.kafka.bootstrap-servers");
    assert_eq!(shared.provider().config(), &config);
    assert_eq!(shared.state(), ResourceState::Uninitialized);

    let err = kafka::configure(KafkaResourceConfig::default()).unwrap_err();
    assert!(matches!(err, ResourceError::Config(_)));

    // Stop before anything started is a no-op and provisions nothing
    kafka::shared().stop();
    assert_eq!(shared.provision_count(), 0);
}
