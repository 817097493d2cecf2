// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Traversal Integration Tests
//!
//! `collect_all_under`, `collect_with` and `traverse::run_scoped` against
//! in-memory address spaces.
//!
//! ## Test Categories
//!
//! - `test_bound_*`: max_count handling
//! - `test_order_*`: work list order
//! - `test_cycle_*` / `test_dedup_*`: revisit behaviour
//! - `test_error_*`: failure propagation
//! - `test_scoped_*`: connect/disconnect around a traversal

use opcscope_opcua::traverse::{collect_all_under, collect_with};
use opcscope_tests::prelude::*;

// =============================================================================
// Bounds
// =============================================================================

#[tokio::test]
async fn test_bound_zero_makes_no_calls() {
    let mock = MockTransport::connected(AddressSpaceFixtures::rabc());

    let nodes = collect_all_under(&mock, &NodeFixtures::r(), 0).await.unwrap();

    assert!(nodes.is_empty());
    assert_eq!(mock.browse_count(), 0);
}

#[tokio::test]
async fn test_bound_leaf_root() {
    let mock = MockTransport::connected(AddressSpaceFixtures::rabc());

    for k in [1, 2, 100] {
        let nodes = collect_all_under(&mock, &NodeFixtures::c(), k).await.unwrap();
        nodes.assert_order(&[NodeFixtures::c()]);
    }
}

#[tokio::test]
async fn test_bound_tree_collects_every_node_once() {
    let space = AddressSpaceFixtures::tree(3, 4);
    let expected = space.nodes();
    assert_eq!(expected.len(), 121);
    let mock = MockTransport::connected(space);

    let nodes = collect_all_under(&mock, &NodeFixtures::r(), expected.len()).await.unwrap();

    nodes.assert_starts_at(&NodeFixtures::r());
    nodes.assert_unique();
    nodes.assert_same_nodes(&expected);
}

#[tokio::test]
async fn test_bound_truncates_large_tree() {
    let mock = MockTransport::connected(AddressSpaceFixtures::tree(3, 4));

    let nodes = collect_all_under(&mock, &NodeFixtures::r(), 50).await.unwrap();

    assert_eq!(nodes.len(), 50);
    nodes.assert_unique();
    assert_eq!(mock.browse_count(), 50);
}

#[tokio::test]
async fn test_bound_wide_fan_out() {
    let mock = MockTransport::connected(AddressSpaceFixtures::wide(1_000));

    let nodes = collect_all_under(&mock, &NodeFixtures::r(), 10).await.unwrap();

    assert_eq!(nodes.len(), 10);
    nodes.assert_starts_at(&NodeFixtures::r());
    // Stack order visits the last pushed child first.
    assert_eq!(nodes[1], NodeFixtures::numbered(1_000));
    assert_eq!(nodes[9], NodeFixtures::numbered(992));
}

// =============================================================================
// Order
// =============================================================================

#[tokio::test]
async fn test_order_stack_rabc() {
    let mock = MockTransport::connected(AddressSpaceFixtures::rabc());

    let nodes = collect_all_under(&mock, &NodeFixtures::r(), 10).await.unwrap();

    nodes.assert_order(&[
        NodeFixtures::r(),
        NodeFixtures::b(),
        NodeFixtures::c(),
        NodeFixtures::a(),
    ]);
}

#[tokio::test]
async fn test_order_queue_rabc() {
    let mock = MockTransport::connected(AddressSpaceFixtures::rabc());
    let options = TraversalOptions::with_max_count(10).order(WorkListOrder::Queue);

    let nodes = collect_with(&mock, &NodeFixtures::r(), &options).await.unwrap();

    nodes.assert_order(&[
        NodeFixtures::r(),
        NodeFixtures::a(),
        NodeFixtures::b(),
        NodeFixtures::c(),
    ]);
}

// =============================================================================
// Revisits
// =============================================================================

#[tokio::test]
async fn test_cycle_fills_bound() {
    let mock = MockTransport::connected(AddressSpaceFixtures::cycle());

    for k in [1, 3, 7, 100] {
        let nodes = collect_all_under(&mock, &NodeFixtures::r(), k).await.unwrap();
        assert_eq!(nodes.len(), k);
    }
}

#[tokio::test]
async fn test_cycle_self_loop() {
    let mock = MockTransport::connected(AddressSpaceFixtures::self_loop());

    let nodes = collect_all_under(&mock, &NodeFixtures::r(), 5).await.unwrap();

    assert_eq!(nodes, vec![NodeFixtures::r(); 5]);
}

#[tokio::test]
async fn test_dedup_terminates_on_cycle() {
    let mock = MockTransport::connected(AddressSpaceFixtures::cycle());
    let options = TraversalOptions::with_max_count(100).visit(VisitPolicy::Deduplicate);

    let nodes = collect_with(&mock, &NodeFixtures::r(), &options).await.unwrap();

    nodes.assert_order(&[NodeFixtures::r(), NodeFixtures::a(), NodeFixtures::b()]);
}

#[tokio::test]
async fn test_dedup_diamond() {
    let mock = MockTransport::connected(AddressSpaceFixtures::diamond());

    let revisit = collect_all_under(&mock, &NodeFixtures::r(), 100).await.unwrap();
    assert_eq!(revisit.iter().filter(|n| **n == NodeFixtures::d()).count(), 2);

    let options = TraversalOptions::with_max_count(100).visit(VisitPolicy::Deduplicate);
    let dedup = collect_with(&mock, &NodeFixtures::r(), &options).await.unwrap();
    dedup.assert_unique();
    assert_eq!(dedup.len(), 4);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_error_browse_failure_aborts() {
    let mock = MockTransport::connected(AddressSpaceFixtures::rabc());
    mock.fail_browse_of(NodeFixtures::c());

    let err = collect_all_under(&mock, &NodeFixtures::r(), 10).await.unwrap_err();

    assert_error_category(&err, "browse");
    // R, B, C browsed; A never reached.
    assert_eq!(mock.browse_count(), 3);
}

#[tokio::test]
async fn test_error_not_connected() {
    let mock = MockTransport::new(AddressSpaceFixtures::rabc());

    let err = collect_all_under(&mock, &NodeFixtures::r(), 10).await.unwrap_err();

    assert_error_category(&err, "connection");
}

// =============================================================================
// Scoped
// =============================================================================

#[tokio::test]
async fn test_scoped_traverse_report() {
    let mock = MockTransport::new(AddressSpaceFixtures::rabc());

    let report = traverse::run_scoped(
        mock.clone(),
        NodeFixtures::r(),
        TraversalOptions::with_max_count(10),
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.root, NodeFixtures::r());
    assert_eq!(report.count(), 4);
    assert_eq!(report.preview(2), &[NodeFixtures::r(), NodeFixtures::b()]);
    mock.assert_released_once();
}

#[tokio::test]
async fn test_scoped_traverse_error_still_disconnects() {
    let mock = MockTransport::new(AddressSpaceFixtures::rabc());
    mock.fail_browse_of(NodeFixtures::a());

    let err = traverse::run_scoped(
        mock.clone(),
        NodeFixtures::r(),
        TraversalOptions::default(),
        None,
    )
    .await
    .unwrap_err();

    assert_error_category(&err, "browse");
    mock.assert_released_once();
}

#[tokio::test]
async fn test_scoped_traverse_report_serializes() {
    let mock = MockTransport::new(AddressSpaceFixtures::rabc());

    let report = traverse::run_scoped(mock, NodeFixtures::r(), TraversalOptions::default(), None)
        .await
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["nodes"].as_array().unwrap().len(), 4);
    assert!(json["elapsed_secs"].is_number());
}
