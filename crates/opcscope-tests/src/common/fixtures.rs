// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Ready-made address spaces. Each fixture is a fresh value, so tests never
//! share state through a fixture.

use opcscope_opcua::{AccessLevel, NodeId, OpcUaValue};

use super::builders::AddressSpaceBuilder;
use super::mocks::AddressSpace;

/// OPC Foundation namespace URI (always index 0).
pub const OPC_FOUNDATION_URI: &str = "http://opcfoundation.org/UA/";

/// Namespace of the demo server variables.
pub const SIMPLE_SERVER_URI: &str = "urn:simple-server";

// =============================================================================
// Node Fixtures
// =============================================================================

/// Named node ids used across fixtures.
pub struct NodeFixtures;

impl NodeFixtures {
    /// Node `ns=2;s=R`.
    pub fn r() -> NodeId {
        NodeId::string(2, "R")
    }

    /// Node `ns=2;s=A`.
    pub fn a() -> NodeId {
        NodeId::string(2, "A")
    }

    /// Node `ns=2;s=B`.
    pub fn b() -> NodeId {
        NodeId::string(2, "B")
    }

    /// Node `ns=2;s=C`.
    pub fn c() -> NodeId {
        NodeId::string(2, "C")
    }

    /// Node `ns=2;s=D`.
    pub fn d() -> NodeId {
        NodeId::string(2, "D")
    }

    /// Demo variable `ns=2;s=v{n}`.
    pub fn v(n: u32) -> NodeId {
        NodeId::string(2, format!("v{}", n))
    }

    /// Numbered node `ns=2;i={n}`.
    pub fn numbered(n: u32) -> NodeId {
        NodeId::numeric(2, n)
    }
}

// =============================================================================
// Address Space Fixtures
// =============================================================================

/// Pre-built address spaces.
pub struct AddressSpaceFixtures;

impl AddressSpaceFixtures {
    /// R → [A, B], B → [C].
    pub fn rabc() -> AddressSpace {
        AddressSpaceBuilder::new()
            .references(NodeFixtures::r(), [NodeFixtures::a(), NodeFixtures::b()])
            .references(NodeFixtures::b(), [NodeFixtures::c()])
            .build()
    }

    /// R → [A], A → [B], B → [R].
    pub fn cycle() -> AddressSpace {
        AddressSpaceBuilder::new()
            .references(NodeFixtures::r(), [NodeFixtures::a()])
            .references(NodeFixtures::a(), [NodeFixtures::b()])
            .references(NodeFixtures::b(), [NodeFixtures::r()])
            .build()
    }

    /// R → R.
    pub fn self_loop() -> AddressSpace {
        AddressSpaceBuilder::new()
            .references(NodeFixtures::r(), [NodeFixtures::r()])
            .build()
    }

    /// R → [A, B], A → [D], B → [D]: D is reachable twice.
    pub fn diamond() -> AddressSpace {
        AddressSpaceBuilder::new()
            .references(NodeFixtures::r(), [NodeFixtures::a(), NodeFixtures::b()])
            .references(NodeFixtures::a(), [NodeFixtures::d()])
            .references(NodeFixtures::b(), [NodeFixtures::d()])
            .build()
    }

    /// R with `fan_out` leaf children numbered `1..=fan_out`.
    pub fn wide(fan_out: u32) -> AddressSpace {
        AddressSpaceBuilder::new()
            .references(NodeFixtures::r(), (1..=fan_out).map(NodeFixtures::numbered))
            .build()
    }

    /// Complete tree under R with the given branching factor and depth.
    ///
    /// Holds `(b^(depth+1) - 1) / (b - 1)` nodes for `b > 1`.
    pub fn tree(branching: u32, depth: u32) -> AddressSpace {
        let mut builder = AddressSpaceBuilder::new();
        let mut level = vec![NodeFixtures::r()];
        let mut next_id = 1;

        for _ in 0..depth {
            let mut next_level = Vec::new();
            for parent in level {
                let children: Vec<NodeId> = (0..branching)
                    .map(|_| {
                        let id = NodeFixtures::numbered(next_id);
                        next_id += 1;
                        id
                    })
                    .collect();
                next_level.extend(children.iter().cloned());
                builder = builder.references(parent, children);
            }
            level = next_level;
        }

        builder.build()
    }

    /// The demo server: namespace `urn:simple-server` at index 2 with
    /// variables `v1`..`v4`, `v4` writable.
    pub fn simple_server() -> AddressSpace {
        AddressSpaceBuilder::new()
            .namespaces([OPC_FOUNDATION_URI, "urn:freeopcua:python:server", SIMPLE_SERVER_URI])
            .double(NodeFixtures::v(1), 1.0)
            .value(NodeFixtures::v(2), OpcUaValue::Int32(2))
            .value(NodeFixtures::v(3), OpcUaValue::String("three".to_string()))
            .double(NodeFixtures::v(4), 4.5)
            .access(NodeFixtures::v(1), AccessLevel::CURRENT_READ)
            .access(NodeFixtures::v(2), AccessLevel::CURRENT_READ)
            .access(NodeFixtures::v(3), AccessLevel::CURRENT_READ)
            .writable(NodeFixtures::v(4))
            .references(NodeId::OBJECTS_FOLDER, [NodeId::SERVER, NodeFixtures::numbered(1)])
            .references(
                NodeFixtures::numbered(1),
                (1..=4).map(NodeFixtures::v),
            )
            .build()
    }
}
