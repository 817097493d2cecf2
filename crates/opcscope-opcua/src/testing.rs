// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory transport for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::{BrowseResult, OpcUaTransport, OpcUaValue, ReadResult, TransportState, WriteResult};
use crate::error::{ConnectionError, OpcUaError, OpcUaResult};
use crate::types::{AccessLevel, AttributeId, NodeId, OpcUaConfig};

#[derive(Default)]
struct Inner {
    connected: bool,
    children: HashMap<NodeId, Vec<NodeId>>,
    values: HashMap<NodeId, OpcUaValue>,
    access: HashMap<NodeId, AccessLevel>,
    browse_failures: HashSet<NodeId>,
    write_status: HashMap<NodeId, u32>,
    browse_calls: usize,
    reads: Vec<NodeId>,
    writes: Vec<(NodeId, OpcUaValue)>,
    connects: usize,
    disconnects: usize,
    connect_delay: Option<Duration>,
    refuse_connect: bool,
    fail_disconnect: bool,
}

/// Shared-state transport; clones observe the same calls.
#[derive(Clone)]
pub(crate) struct MemoryTransport {
    config: OpcUaConfig,
    inner: Arc<Mutex<Inner>>,
}

impl MemoryTransport {
    pub(crate) fn new() -> Self {
        Self {
            config: OpcUaConfig::default(),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub(crate) fn with_children(self, parent: NodeId, children: Vec<NodeId>) -> Self {
        self.inner.lock().children.insert(parent, children);
        self
    }

    pub(crate) fn with_browse_failure(self, node: NodeId) -> Self {
        self.inner.lock().browse_failures.insert(node);
        self
    }

    pub(crate) fn with_value(self, node: NodeId, value: OpcUaValue) -> Self {
        self.inner.lock().values.insert(node, value);
        self
    }

    pub(crate) fn with_access(self, node: NodeId, level: AccessLevel) -> Self {
        self.inner.lock().access.insert(node, level);
        self
    }

    pub(crate) fn with_namespaces(self, uris: &[&str]) -> Self {
        let array = uris
            .iter()
            .map(|u| OpcUaValue::String((*u).to_string()))
            .collect();
        self.with_value(NodeId::NAMESPACE_ARRAY, OpcUaValue::Array(array))
    }

    pub(crate) fn with_write_status(self, node: NodeId, status: u32) -> Self {
        self.inner.lock().write_status.insert(node, status);
        self
    }

    /// Refuses every connect attempt.
    pub(crate) fn with_connect_refused(self) -> Self {
        self.inner.lock().refuse_connect = true;
        self
    }

    /// Sleeps before completing connect; pair with paused tokio time.
    pub(crate) fn with_connect_delay(self, delay: Duration) -> Self {
        self.inner.lock().connect_delay = Some(delay);
        self
    }

    /// Disconnect drops the session but reports a failure.
    pub(crate) fn with_disconnect_failure(self) -> Self {
        self.inner.lock().fail_disconnect = true;
        self
    }

    pub(crate) fn connects(&self) -> usize {
        self.inner.lock().connects
    }

    pub(crate) fn browse_calls(&self) -> usize {
        self.inner.lock().browse_calls
    }

    pub(crate) fn reads(&self) -> Vec<NodeId> {
        self.inner.lock().reads.clone()
    }

    pub(crate) fn writes(&self) -> Vec<(NodeId, OpcUaValue)> {
        self.inner.lock().writes.clone()
    }

    pub(crate) fn disconnects(&self) -> usize {
        self.inner.lock().disconnects
    }
}

#[async_trait]
impl OpcUaTransport for MemoryTransport {
    async fn connect(&mut self) -> OpcUaResult<()> {
        let delay = {
            let mut inner = self.inner.lock();
            inner.connects += 1;
            inner.connect_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut inner = self.inner.lock();
        if inner.refuse_connect {
            return Err(OpcUaError::connection_refused(self.config.endpoint.clone()));
        }
        inner.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> OpcUaResult<()> {
        let mut inner = self.inner.lock();
        inner.connected = false;
        inner.disconnects += 1;
        if inner.fail_disconnect {
            return Err(OpcUaError::connection(ConnectionError::disconnect_failed(
                self.config.endpoint.clone(),
                "socket reset",
            )));
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.inner.lock().connected
    }

    fn state(&self) -> TransportState {
        if self.is_connected() {
            TransportState::Connected
        } else {
            TransportState::Disconnected
        }
    }

    async fn read_attribute(&self, node_id: &NodeId, attribute: AttributeId) -> OpcUaResult<ReadResult> {
        let mut inner = self.inner.lock();
        inner.reads.push(node_id.clone());
        let result = match attribute {
            AttributeId::AccessLevel => match inner.access.get(node_id) {
                Some(level) => ReadResult::success(node_id.clone(), OpcUaValue::Byte(level.bits())),
                None => ReadResult::failure(node_id.clone(), 0x8034_0000),
            },
            _ => match inner.values.get(node_id) {
                Some(value) => ReadResult::success(node_id.clone(), value.clone()),
                None => ReadResult::failure(node_id.clone(), 0x8034_0000),
            },
        };
        Ok(result)
    }

    async fn write_value(&self, node_id: &NodeId, value: OpcUaValue) -> OpcUaResult<WriteResult> {
        let mut inner = self.inner.lock();
        inner.writes.push((node_id.clone(), value.clone()));
        if let Some(status) = inner.write_status.get(node_id).copied() {
            return Ok(WriteResult::failure(node_id.clone(), status));
        }
        inner.values.insert(node_id.clone(), value);
        Ok(WriteResult::success(node_id.clone()))
    }

    async fn browse(&self, node_id: &NodeId) -> OpcUaResult<Vec<BrowseResult>> {
        let mut inner = self.inner.lock();
        inner.browse_calls += 1;
        if inner.browse_failures.contains(node_id) {
            return Err(OpcUaError::node_not_found(node_id.to_string()));
        }
        Ok(inner
            .children
            .get(node_id)
            .map(|c| c.iter().cloned().map(BrowseResult::child).collect())
            .unwrap_or_default())
    }

    fn display_name(&self) -> String {
        "memory".to_string()
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn config(&self) -> &OpcUaConfig {
        &self.config
    }
}
