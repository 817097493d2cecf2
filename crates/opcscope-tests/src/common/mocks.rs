// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! [`MockTransport`] serves an in-memory [`AddressSpace`] through the
//! [`OpcUaTransport`] trait.
//!
//! - Clones share state, so a test can hand one clone to a scoped connection
//!   and inspect the other afterwards
//! - Every call is recorded in order
//! - Failures can be injected per operation

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use opcscope_opcua::client::{BrowseResult, ReadResult, TransportState, WriteResult};
use opcscope_opcua::{
    AccessLevel, AttributeId, ConnectionError, NodeId, OpcUaConfig, OpcUaError, OpcUaResult,
    OpcUaTransport, OpcUaValue,
};

/// `BadNodeIdUnknown`.
pub const BAD_NODE_ID_UNKNOWN: u32 = 0x8034_0000;

/// `BadNotWritable`.
pub const BAD_NOT_WRITABLE: u32 = 0x803B_0000;

// =============================================================================
// Address Space
// =============================================================================

/// Nodes, references and attribute values served by a [`MockTransport`].
#[derive(Debug, Clone, Default)]
pub struct AddressSpace {
    /// Forward hierarchical references in server order.
    pub children: HashMap<NodeId, Vec<NodeId>>,
    /// Value attributes.
    pub values: HashMap<NodeId, OpcUaValue>,
    /// AccessLevel attributes.
    pub access: HashMap<NodeId, AccessLevel>,
}

impl AddressSpace {
    /// Every node mentioned in the space.
    pub fn nodes(&self) -> HashSet<NodeId> {
        let mut nodes: HashSet<NodeId> = HashSet::new();
        for (parent, children) in &self.children {
            nodes.insert(parent.clone());
            nodes.extend(children.iter().cloned());
        }
        nodes.extend(self.values.keys().cloned());
        nodes
    }
}

// =============================================================================
// Recorded Calls
// =============================================================================

/// One call made against a [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    /// `connect`
    Connect,
    /// `disconnect`
    Disconnect,
    /// `browse` of a node.
    Browse(NodeId),
    /// `read_attribute` of a node.
    Read(NodeId, AttributeId),
    /// `write_value` of a node.
    Write(NodeId, OpcUaValue),
}

impl MockCall {
    /// Returns `true` for reads and writes.
    pub fn is_data_access(&self) -> bool {
        matches!(self, Self::Read(..) | Self::Write(..))
    }
}

// =============================================================================
// Mock Transport
// =============================================================================

#[derive(Debug, Default)]
struct MockState {
    space: Mutex<AddressSpace>,
    connected: AtomicBool,

    fail_connection: AtomicBool,
    fail_disconnect: AtomicBool,
    fail_all_reads: AtomicBool,
    browse_failures: Mutex<HashSet<NodeId>>,
    write_status: Mutex<HashMap<NodeId, u32>>,
    connect_latency: Mutex<Duration>,
    browse_latency: Mutex<Duration>,

    connect_count: AtomicU64,
    disconnect_count: AtomicU64,
    browse_count: AtomicU64,
    read_count: AtomicU64,
    write_count: AtomicU64,
    calls: Mutex<Vec<MockCall>>,
}

/// An in-memory node client.
#[derive(Debug, Clone)]
pub struct MockTransport {
    config: OpcUaConfig,
    state: Arc<MockState>,
}

impl MockTransport {
    /// Creates a mock serving `space`.
    pub fn new(space: AddressSpace) -> Self {
        let state = MockState {
            space: Mutex::new(space),
            ..MockState::default()
        };
        Self {
            config: OpcUaConfig::default(),
            state: Arc::new(state),
        }
    }

    /// Creates a mock that starts out connected, for calling traversal and
    /// probe functions directly.
    pub fn connected(space: AddressSpace) -> Self {
        let mock = Self::new(space);
        mock.state.connected.store(true, Ordering::SeqCst);
        mock
    }

    /// Creates a mock with an empty address space.
    pub fn empty() -> Self {
        Self::new(AddressSpace::default())
    }

    // =========================================================================
    // Failure Injection
    // =========================================================================

    /// Makes `connect` fail.
    pub fn fail_connection(&self, fail: bool) {
        self.state.fail_connection.store(fail, Ordering::SeqCst);
    }

    /// Makes `disconnect` fail (the transport still ends up disconnected).
    pub fn fail_disconnect(&self, fail: bool) {
        self.state.fail_disconnect.store(fail, Ordering::SeqCst);
    }

    /// Makes every read fail at the transport level.
    pub fn fail_all_reads(&self, fail: bool) {
        self.state.fail_all_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes browsing `node` fail.
    pub fn fail_browse_of(&self, node: NodeId) {
        self.state.browse_failures.lock().insert(node);
    }

    /// Makes writes to `node` return `status`.
    pub fn reject_writes_to(&self, node: NodeId, status: u32) {
        self.state.write_status.lock().insert(node, status);
    }

    /// Delays every `connect` by `latency`.
    pub fn set_connect_latency(&self, latency: Duration) {
        *self.state.connect_latency.lock() = latency;
    }

    /// Delays every `browse` by `latency`.
    pub fn set_browse_latency(&self, latency: Duration) {
        *self.state.browse_latency.lock() = latency;
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Number of `connect` calls.
    pub fn connect_count(&self) -> u64 {
        self.state.connect_count.load(Ordering::SeqCst)
    }

    /// Number of `disconnect` calls.
    pub fn disconnect_count(&self) -> u64 {
        self.state.disconnect_count.load(Ordering::SeqCst)
    }

    /// Number of `browse` calls.
    pub fn browse_count(&self) -> u64 {
        self.state.browse_count.load(Ordering::SeqCst)
    }

    /// Number of `read_attribute` calls.
    pub fn read_count(&self) -> u64 {
        self.state.read_count.load(Ordering::SeqCst)
    }

    /// Number of `write_value` calls.
    pub fn write_count(&self) -> u64 {
        self.state.write_count.load(Ordering::SeqCst)
    }

    /// Every call in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.calls.lock().clone()
    }

    /// Current Value attribute of `node`.
    pub fn value_of(&self, node: &NodeId) -> Option<OpcUaValue> {
        self.state.space.lock().values.get(node).cloned()
    }

    fn record(&self, call: MockCall) {
        self.state.calls.lock().push(call);
    }

    fn ensure_connected(&self) -> OpcUaResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(OpcUaError::not_connected())
        }
    }
}

#[async_trait]
impl OpcUaTransport for MockTransport {
    async fn connect(&mut self) -> OpcUaResult<()> {
        self.state.connect_count.fetch_add(1, Ordering::SeqCst);
        self.record(MockCall::Connect);

        let latency = *self.state.connect_latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.state.fail_connection.load(Ordering::SeqCst) {
            return Err(OpcUaError::connection_refused(self.config.endpoint.clone()));
        }

        self.state.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&mut self) -> OpcUaResult<()> {
        self.state.disconnect_count.fetch_add(1, Ordering::SeqCst);
        self.record(MockCall::Disconnect);
        self.state.connected.store(false, Ordering::SeqCst);

        if self.state.fail_disconnect.load(Ordering::SeqCst) {
            return Err(OpcUaError::connection(ConnectionError::disconnect_failed(
                self.config.endpoint.clone(),
                "mock disconnect failure",
            )));
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::SeqCst)
    }

    fn state(&self) -> TransportState {
        if self.is_connected() {
            TransportState::Connected
        } else {
            TransportState::Disconnected
        }
    }

    async fn read_attribute(&self, node_id: &NodeId, attribute_id: AttributeId) -> OpcUaResult<ReadResult> {
        self.state.read_count.fetch_add(1, Ordering::SeqCst);
        self.record(MockCall::Read(node_id.clone(), attribute_id));
        self.ensure_connected()?;

        if self.state.fail_all_reads.load(Ordering::SeqCst) {
            return Err(OpcUaError::read_failed(node_id.to_string(), "mock read failure"));
        }

        let space = self.state.space.lock();
        let value = match attribute_id {
            AttributeId::AccessLevel => space
                .access
                .get(node_id)
                .map(|level| OpcUaValue::Byte(level.bits())),
            _ => space.values.get(node_id).cloned(),
        };

        Ok(match value {
            Some(value) => ReadResult::success(node_id.clone(), value),
            None => ReadResult::failure(node_id.clone(), BAD_NODE_ID_UNKNOWN),
        })
    }

    async fn write_value(&self, node_id: &NodeId, value: OpcUaValue) -> OpcUaResult<WriteResult> {
        self.state.write_count.fetch_add(1, Ordering::SeqCst);
        self.record(MockCall::Write(node_id.clone(), value.clone()));
        self.ensure_connected()?;

        if let Some(status) = self.state.write_status.lock().get(node_id).copied() {
            return Ok(WriteResult::failure(node_id.clone(), status));
        }

        let mut space = self.state.space.lock();
        if !space.values.contains_key(node_id) {
            return Ok(WriteResult::failure(node_id.clone(), BAD_NODE_ID_UNKNOWN));
        }
        space.values.insert(node_id.clone(), value);
        Ok(WriteResult::success(node_id.clone()))
    }

    async fn browse(&self, node_id: &NodeId) -> OpcUaResult<Vec<BrowseResult>> {
        self.state.browse_count.fetch_add(1, Ordering::SeqCst);
        self.record(MockCall::Browse(node_id.clone()));
        self.ensure_connected()?;

        let latency = *self.state.browse_latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.state.browse_failures.lock().contains(node_id) {
            return Err(OpcUaError::node_not_found(node_id.to_string()));
        }

        let space = self.state.space.lock();
        Ok(space
            .children
            .get(node_id)
            .map(|children| children.iter().cloned().map(BrowseResult::child).collect())
            .unwrap_or_default())
    }

    fn display_name(&self) -> String {
        "mock".to_string()
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn config(&self) -> &OpcUaConfig {
        &self.config
    }
}
