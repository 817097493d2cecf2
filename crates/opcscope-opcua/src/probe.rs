// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Read/write probe.
//!
//! A fixed, linear exercise of a server: resolve a namespace, read a set of
//! variables, read the access level of a target, write a value to it and read
//! it back. Every completed step is reported through a [`ProbeEvent`] as soon
//! as it happens; the first failure stops the sequence.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::client::{OpcUaTransport, OpcUaValue, ScopedConnection};
use crate::error::OpcUaResult;
use crate::types::{AccessLevel, NodeId};

/// Namespace URI of the demo server.
pub const DEFAULT_NAMESPACE_URI: &str = "urn:simple-server";

/// Value written to the target by default.
pub const DEFAULT_WRITE_VALUE: f64 = 50.0;

/// Variables read by default (`ns=2;s=v1` .. `ns=2;s=v4`).
pub fn default_read_nodes() -> Vec<NodeId> {
    (1..=4).map(|i| NodeId::string(2, format!("v{}", i))).collect()
}

/// Default write target (`ns=2;s=v4`).
pub fn default_target() -> NodeId {
    NodeId::string(2, "v4")
}

// =============================================================================
// ProbePlan
// =============================================================================

/// What a probe reads and writes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbePlan {
    /// Namespace URI to resolve.
    pub namespace_uri: String,

    /// Nodes whose values are read, in order.
    pub read_nodes: Vec<NodeId>,

    /// Node whose access level is read and which is written.
    pub target: NodeId,

    /// Value written to the target.
    pub write_value: OpcUaValue,
}

impl Default for ProbePlan {
    fn default() -> Self {
        Self {
            namespace_uri: DEFAULT_NAMESPACE_URI.to_string(),
            read_nodes: default_read_nodes(),
            target: default_target(),
            write_value: OpcUaValue::Double(DEFAULT_WRITE_VALUE),
        }
    }
}

// =============================================================================
// ProbeEvent
// =============================================================================

/// A completed probe step.
///
/// `Display` renders the console line for the step.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeEvent {
    /// The namespace URI was found in the server NamespaceArray.
    NamespaceResolved {
        /// The URI.
        uri: String,
        /// Its index.
        index: u16,
    },

    /// A current value was read.
    ValueRead {
        /// Node read.
        node_id: NodeId,
        /// Value returned.
        value: OpcUaValue,
    },

    /// The target access level was read.
    AccessLevelRead {
        /// Target node.
        node_id: NodeId,
        /// Access level bits.
        level: AccessLevel,
    },

    /// The target was written.
    ValueWritten {
        /// Target node.
        node_id: NodeId,
        /// Value written.
        value: OpcUaValue,
    },

    /// The target was read back after the write.
    ValueReRead {
        /// Target node.
        node_id: NodeId,
        /// Value returned.
        value: OpcUaValue,
    },
}

impl fmt::Display for ProbeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamespaceResolved { uri, index } => {
                write!(f, "Namespace Index for '{}': {}", uri, index)
            }
            Self::ValueRead { node_id, value } => write!(f, "{} value: {}", node_id.label(), value),
            Self::AccessLevelRead { node_id, level } => {
                write!(f, "{} access level: {}", node_id.label(), level)
            }
            Self::ValueWritten { node_id, value } => {
                write!(f, "Writing to {}: {}", node_id.label(), value)
            }
            Self::ValueReRead { node_id, value } => {
                write!(f, "{} new value: {}", node_id.label(), value)
            }
        }
    }
}

// =============================================================================
// ProbeReport
// =============================================================================

/// A node id paired with the value read from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRecord {
    /// Node read.
    pub node_id: NodeId,
    /// Value returned.
    pub value: OpcUaValue,
}

/// Everything a successful probe observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeReport {
    /// Resolved namespace URI.
    pub namespace_uri: String,
    /// Its index.
    pub namespace_index: u16,
    /// Step-3 reads in plan order.
    pub reads: Vec<ValueRecord>,
    /// Access level of the target.
    pub access_level: AccessLevel,
    /// Target value before the write.
    pub before: OpcUaValue,
    /// Value written.
    pub written: OpcUaValue,
    /// Target value after the write.
    pub after: OpcUaValue,
}

impl ProbeReport {
    /// Returns `true` if the re-read value equals the written value.
    pub fn write_confirmed(&self) -> bool {
        self.after == self.written
    }
}

// =============================================================================
// Execution
// =============================================================================

/// Runs the probe on an already-connected client.
///
/// Statuses other than good abort the sequence; uncertain reads are accepted
/// as returned.
pub async fn run_probe<T, F>(client: &T, plan: &ProbePlan, mut on_event: F) -> OpcUaResult<ProbeReport>
where
    T: OpcUaTransport + ?Sized,
    F: FnMut(&ProbeEvent) + Send,
{
    let mut emit = |event: ProbeEvent| {
        tracing::debug!(event = %event, "Probe step completed");
        on_event(&event);
    };

    let namespace_index = client.namespace_index(&plan.namespace_uri).await?;
    emit(ProbeEvent::NamespaceResolved {
        uri: plan.namespace_uri.clone(),
        index: namespace_index,
    });

    let mut reads = Vec::with_capacity(plan.read_nodes.len());
    for node_id in &plan.read_nodes {
        let value = client.read_value(node_id).await?.into_value()?;
        emit(ProbeEvent::ValueRead {
            node_id: node_id.clone(),
            value: value.clone(),
        });
        reads.push(ValueRecord {
            node_id: node_id.clone(),
            value,
        });
    }

    let access_level = client.access_level(&plan.target).await?;
    emit(ProbeEvent::AccessLevelRead {
        node_id: plan.target.clone(),
        level: access_level,
    });

    let before = match reads.iter().rev().find(|r| r.node_id == plan.target) {
        Some(record) => record.value.clone(),
        None => {
            let value = client.read_value(&plan.target).await?.into_value()?;
            emit(ProbeEvent::ValueRead {
                node_id: plan.target.clone(),
                value: value.clone(),
            });
            value
        }
    };

    if !access_level.is_writable() {
        tracing::warn!(
            node_id = %plan.target,
            access_level = %access_level,
            "Target does not advertise CurrentWrite; attempting write anyway"
        );
    }

    client
        .write_value(&plan.target, plan.write_value.clone())
        .await?
        .into_result()?;
    emit(ProbeEvent::ValueWritten {
        node_id: plan.target.clone(),
        value: plan.write_value.clone(),
    });

    let after = client.read_value(&plan.target).await?.into_value()?;
    emit(ProbeEvent::ValueReRead {
        node_id: plan.target.clone(),
        value: after.clone(),
    });

    Ok(ProbeReport {
        namespace_uri: plan.namespace_uri.clone(),
        namespace_index,
        reads,
        access_level,
        before,
        written: plan.write_value.clone(),
        after,
    })
}

/// Connects `transport`, runs the probe, and disconnects.
pub async fn run_scoped<T, F>(
    transport: T,
    plan: ProbePlan,
    deadline: Option<Duration>,
    on_event: F,
) -> OpcUaResult<ProbeReport>
where
    T: OpcUaTransport + 'static,
    F: FnMut(&ProbeEvent) + Send + 'static,
{
    let mut scope = ScopedConnection::new(transport).with_optional_deadline(deadline);
    scope
        .run(move |client| Box::pin(async move { run_probe(client, &plan, on_event).await }))
        .await
}
