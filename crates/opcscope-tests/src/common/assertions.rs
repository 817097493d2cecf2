// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertion helpers with failure messages that show the offending nodes.

use std::collections::HashSet;

use opcscope_opcua::{NodeId, OpcUaError, OpcUaTransport};

use super::mocks::{MockCall, MockTransport};

// =============================================================================
// Traversal Assertions
// =============================================================================

/// Assertion extensions for collected node lists.
pub trait TraversalAssertions {
    /// Assert that the list starts with `root`.
    fn assert_starts_at(&self, root: &NodeId);

    /// Assert that no node appears twice.
    fn assert_unique(&self);

    /// Assert that the list holds exactly the nodes in `expected`, in any order.
    fn assert_same_nodes(&self, expected: &HashSet<NodeId>);

    /// Assert the exact visit order.
    fn assert_order(&self, expected: &[NodeId]);
}

impl TraversalAssertions for [NodeId] {
    fn assert_starts_at(&self, root: &NodeId) {
        assert_eq!(
            self.first(),
            Some(root),
            "Expected traversal to start at {}, got {:?}",
            root,
            self.first()
        );
    }

    fn assert_unique(&self) {
        let mut seen = HashSet::new();
        for node in self {
            assert!(seen.insert(node), "Node {} collected more than once", node);
        }
    }

    fn assert_same_nodes(&self, expected: &HashSet<NodeId>) {
        let actual: HashSet<NodeId> = self.iter().cloned().collect();
        let missing: Vec<_> = expected.difference(&actual).collect();
        let extra: Vec<_> = actual.difference(expected).collect();
        assert!(
            missing.is_empty() && extra.is_empty(),
            "Collected nodes differ: missing {:?}, unexpected {:?}",
            missing,
            extra
        );
    }

    fn assert_order(&self, expected: &[NodeId]) {
        let render = |nodes: &[NodeId]| {
            nodes.iter().map(NodeId::label).collect::<Vec<_>>().join(", ")
        };
        assert_eq!(
            self,
            expected,
            "Expected visit order [{}], got [{}]",
            render(expected),
            render(self)
        );
    }
}

impl TraversalAssertions for Vec<NodeId> {
    fn assert_starts_at(&self, root: &NodeId) {
        self.as_slice().assert_starts_at(root)
    }

    fn assert_unique(&self) {
        self.as_slice().assert_unique()
    }

    fn assert_same_nodes(&self, expected: &HashSet<NodeId>) {
        self.as_slice().assert_same_nodes(expected)
    }

    fn assert_order(&self, expected: &[NodeId]) {
        self.as_slice().assert_order(expected)
    }
}

// =============================================================================
// Error Assertions
// =============================================================================

/// Assert that `err` belongs to `category` (connection, browse, operation,
/// configuration, timeout).
pub fn assert_error_category(err: &OpcUaError, category: &str) {
    assert_eq!(
        err.category(),
        category,
        "Expected a {} error, got {} ({})",
        category,
        err.category(),
        err
    );
}

// =============================================================================
// Mock Assertions
// =============================================================================

/// Assertion extensions for [`MockTransport`].
pub trait MockAssertions {
    /// Assert that the transport was connected and released exactly once.
    fn assert_released_once(&self);

    /// Assert that no read or write reached the transport.
    fn assert_no_data_access(&self);
}

impl MockAssertions for MockTransport {
    fn assert_released_once(&self) {
        assert_eq!(self.connect_count(), 1, "Expected one connect");
        assert_eq!(self.disconnect_count(), 1, "Expected one disconnect");
        assert!(!self.is_connected(), "Transport still connected");
        assert_eq!(
            self.calls().last(),
            Some(&MockCall::Disconnect),
            "Disconnect must be the last call"
        );
    }

    fn assert_no_data_access(&self) {
        let data: Vec<_> = self.calls().into_iter().filter(MockCall::is_data_access).collect();
        assert!(data.is_empty(), "Unexpected reads/writes: {:?}", data);
    }
}
