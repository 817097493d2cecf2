// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Fluent construction of [`AddressSpace`]s and [`ProbePlan`]s.

use opcscope_opcua::probe::ProbePlan;
use opcscope_opcua::{AccessLevel, NodeId, OpcUaValue};

use super::mocks::{AddressSpace, MockTransport};

// =============================================================================
// AddressSpaceBuilder
// =============================================================================

/// Builder for [`AddressSpace`].
///
/// ```rust,ignore
/// let space = AddressSpaceBuilder::new()
///     .references(NodeFixtures::r(), [NodeFixtures::a(), NodeFixtures::b()])
///     .double(NodeId::string(2, "v1"), 1.0)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct AddressSpaceBuilder {
    space: AddressSpace,
}

impl AddressSpaceBuilder {
    /// Starts an empty address space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the children of `parent`, in server order.
    pub fn references(mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) -> Self {
        self.space.children.insert(parent, children.into_iter().collect());
        self
    }

    /// Appends one child to `parent`.
    pub fn reference(mut self, parent: NodeId, child: NodeId) -> Self {
        self.space.children.entry(parent).or_default().push(child);
        self
    }

    /// Sets the Value attribute of `node`.
    pub fn value(mut self, node: NodeId, value: OpcUaValue) -> Self {
        self.space.values.insert(node, value);
        self
    }

    /// Sets a Double Value attribute.
    pub fn double(self, node: NodeId, value: f64) -> Self {
        self.value(node, OpcUaValue::Double(value))
    }

    /// Sets the AccessLevel attribute of `node`.
    pub fn access(mut self, node: NodeId, level: AccessLevel) -> Self {
        self.space.access.insert(node, level);
        self
    }

    /// Makes `node` readable and writable.
    pub fn writable(self, node: NodeId) -> Self {
        self.access(node, AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE)
    }

    /// Sets the server NamespaceArray.
    pub fn namespaces<'a>(self, uris: impl IntoIterator<Item = &'a str>) -> Self {
        let array = uris
            .into_iter()
            .map(|uri| OpcUaValue::String(uri.to_string()))
            .collect();
        self.value(NodeId::NAMESPACE_ARRAY, OpcUaValue::Array(array))
    }

    /// Finishes the address space.
    pub fn build(self) -> AddressSpace {
        self.space
    }

    /// Finishes the address space and wraps it in a [`MockTransport`].
    pub fn into_transport(self) -> MockTransport {
        MockTransport::new(self.space)
    }
}

// =============================================================================
// ProbePlanBuilder
// =============================================================================

/// Builder for [`ProbePlan`], starting from the defaults.
#[derive(Debug, Default)]
pub struct ProbePlanBuilder {
    plan: ProbePlan,
}

impl ProbePlanBuilder {
    /// Starts from [`ProbePlan::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace URI.
    pub fn namespace_uri(mut self, uri: impl Into<String>) -> Self {
        self.plan.namespace_uri = uri.into();
        self
    }

    /// Replaces the read list.
    pub fn read_nodes(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.plan.read_nodes = nodes.into_iter().collect();
        self
    }

    /// Sets the write target.
    pub fn target(mut self, node: NodeId) -> Self {
        self.plan.target = node;
        self
    }

    /// Sets a Double write value.
    pub fn write_double(mut self, value: f64) -> Self {
        self.plan.write_value = OpcUaValue::Double(value);
        self
    }

    /// Finishes the plan.
    pub fn build(self) -> ProbePlan {
        self.plan
    }
}
