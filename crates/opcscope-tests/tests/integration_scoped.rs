// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Scoped Connection Integration Tests
//!
//! Release guarantees and outcome precedence of [`ScopedConnection`].

use std::time::Duration;

use opcscope_tests::common::init_test_logging;
use opcscope_tests::prelude::*;

#[tokio::test]
async fn test_scope_connects_runs_and_releases() {
    let mock = MockTransport::new(AddressSpaceFixtures::simple_server());
    let mut scope = ScopedConnection::new(mock.clone());

    let namespaces = scope
        .run(|client| Box::pin(async move { client.namespace_array().await }))
        .await
        .unwrap();

    assert_eq!(namespaces[0], OPC_FOUNDATION_URI);
    assert_eq!(
        mock.calls(),
        vec![
            MockCall::Connect,
            MockCall::Read(NodeId::NAMESPACE_ARRAY, opcscope_opcua::AttributeId::Value),
            MockCall::Disconnect,
        ]
    );
    mock.assert_released_once();
}

#[tokio::test]
async fn test_scope_connect_failure_skips_body() {
    init_test_logging();
    let mock = MockTransport::new(AddressSpaceFixtures::simple_server());
    mock.fail_connection(true);
    let mut scope = ScopedConnection::new(mock.clone());
    let mut ran = false;

    let err = scope
        .run(|_client| {
            ran = true;
            Box::pin(async move { Ok::<(), OpcUaError>(()) })
        })
        .await
        .unwrap_err();

    assert_error_category(&err, "connection");
    assert!(!ran);
    assert_eq!(mock.calls(), vec![MockCall::Connect]);
}

#[tokio::test]
async fn test_scope_body_error_wins_over_disconnect_error() {
    init_test_logging();
    let mock = MockTransport::new(AddressSpaceFixtures::rabc());
    mock.fail_disconnect(true);
    mock.fail_browse_of(NodeFixtures::r());
    let mut scope = ScopedConnection::new(mock.clone());

    let err = scope
        .run(|client| Box::pin(async move { client.children(&NodeFixtures::r()).await }))
        .await
        .unwrap_err();

    assert_error_category(&err, "browse");
    assert_eq!(mock.disconnect_count(), 1);
}

#[tokio::test]
async fn test_scope_disconnect_error_surfaces_after_success() {
    let mock = MockTransport::new(AddressSpaceFixtures::rabc());
    mock.fail_disconnect(true);
    let mut scope = ScopedConnection::new(mock.clone());

    let err = scope
        .run(|client| Box::pin(async move { client.children(&NodeFixtures::r()).await }))
        .await
        .unwrap_err();

    assert_error_category(&err, "connection");
    assert!(!mock.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_scope_deadline_bounds_body() {
    let mock = MockTransport::new(AddressSpaceFixtures::tree(2, 6));
    mock.set_browse_latency(Duration::from_millis(100));

    let err = traverse::run_scoped(
        mock.clone(),
        NodeFixtures::r(),
        TraversalOptions::default(),
        Some(Duration::from_secs(1)),
    )
    .await
    .unwrap_err();

    assert_error_category(&err, "timeout");
    assert!(mock.browse_count() < 127);
    mock.assert_released_once();
}

#[tokio::test(start_paused = true)]
async fn test_scope_deadline_bounds_connect() {
    let mock = MockTransport::new(AddressSpaceFixtures::rabc());
    mock.set_connect_latency(Duration::from_secs(30));

    let err = traverse::run_scoped(
        mock.clone(),
        NodeFixtures::r(),
        TraversalOptions::default(),
        Some(Duration::from_secs(5)),
    )
    .await
    .unwrap_err();

    assert_error_category(&err, "timeout");
    assert_eq!(mock.browse_count(), 0);
    // The connect never completed, so there is nothing to release.
    assert_eq!(mock.disconnect_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_scope_deadline_not_hit() {
    let mock = MockTransport::new(AddressSpaceFixtures::rabc());
    mock.set_browse_latency(Duration::from_millis(10));

    let report = traverse::run_scoped(
        mock.clone(),
        NodeFixtures::r(),
        TraversalOptions::default(),
        Some(Duration::from_secs(1)),
    )
    .await
    .unwrap();

    assert_eq!(report.count(), 4);
    mock.assert_released_once();
}

#[tokio::test]
async fn test_scope_reusable_after_run() {
    let mock = MockTransport::new(AddressSpaceFixtures::rabc());
    let mut scope = ScopedConnection::new(mock.clone());

    for _ in 0..3 {
        let children = scope
            .run(|client| Box::pin(async move { client.children(&NodeFixtures::r()).await }))
            .await
            .unwrap();
        assert_eq!(children, vec![NodeFixtures::a(), NodeFixtures::b()]);
    }

    assert_eq!(mock.connect_count(), 3);
    assert_eq!(mock.disconnect_count(), 3);
    assert!(!scope.transport().is_connected());
}
