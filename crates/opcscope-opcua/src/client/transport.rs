// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA transport abstraction layer.
//!
//! [`OpcUaTransport`] is the node client seam: connection lifecycle plus the
//! per-node read, write and child-enumeration calls the traversal and the
//! probe are written against. The `opcua`-backed implementation lives in
//! `real_transport`; tests substitute an in-memory mock.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{OpcUaError, OpcUaResult, OperationError};
use crate::types::{AccessLevel, AttributeId, NodeId, OpcUaConfig};

// =============================================================================
// TransportState
// =============================================================================

/// Connection state of the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    /// Transport is not connected.
    #[default]
    Disconnected,

    /// Transport is establishing connection.
    Connecting,

    /// Transport is connected and ready.
    Connected,

    /// Transport connection has failed.
    Failed,
}

impl TransportState {
    /// Returns `true` if the transport is connected.
    #[inline]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

// =============================================================================
// Status codes
// =============================================================================

/// Status code severity bits.
const SEVERITY_MASK: u32 = 0xC000_0000;
const SEVERITY_BAD: u32 = 0x8000_0000;
const SEVERITY_UNCERTAIN: u32 = 0x4000_0000;

#[inline]
fn status_is_good(code: u32) -> bool {
    code & SEVERITY_MASK == 0
}

#[inline]
fn status_is_bad(code: u32) -> bool {
    code & SEVERITY_BAD != 0
}

// =============================================================================
// ReadResult
// =============================================================================

/// Result of a node read operation.
#[derive(Debug, Clone)]
pub struct ReadResult {
    /// The node ID that was read.
    pub node_id: NodeId,

    /// The value read (if any).
    pub value: Option<OpcUaValue>,

    /// Status code of the read operation.
    pub status_code: u32,

    /// Server timestamp.
    pub server_timestamp: Option<chrono::DateTime<chrono::Utc>>,

    /// Source timestamp.
    pub source_timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

impl ReadResult {
    /// Creates a successful read result.
    pub fn success(node_id: NodeId, value: OpcUaValue) -> Self {
        Self {
            node_id,
            value: Some(value),
            status_code: 0,
            server_timestamp: Some(chrono::Utc::now()),
            source_timestamp: None,
        }
    }

    /// Creates a failed read result.
    pub fn failure(node_id: NodeId, status_code: u32) -> Self {
        Self {
            node_id,
            value: None,
            status_code,
            server_timestamp: Some(chrono::Utc::now()),
            source_timestamp: None,
        }
    }

    /// Returns `true` if the status is good.
    #[inline]
    pub fn is_good(&self) -> bool {
        status_is_good(self.status_code)
    }

    /// Returns `true` if the status is uncertain.
    #[inline]
    pub fn is_uncertain(&self) -> bool {
        self.status_code & SEVERITY_MASK == SEVERITY_UNCERTAIN
    }

    /// Returns `true` if the status is bad.
    #[inline]
    pub fn is_bad(&self) -> bool {
        status_is_bad(self.status_code)
    }

    /// Unwraps the value, turning a bad status into an error.
    ///
    /// Uncertain values are returned as-is; a missing value reads as
    /// [`OpcUaValue::Null`].
    pub fn into_value(self) -> OpcUaResult<OpcUaValue> {
        if self.is_bad() {
            return Err(OpcUaError::operation(OperationError::bad_status(
                self.node_id.to_string(),
                self.status_code,
            )));
        }
        Ok(self.value.unwrap_or_default())
    }
}

// =============================================================================
// WriteResult
// =============================================================================

/// Result of a node write operation.
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// The node ID that was written.
    pub node_id: NodeId,

    /// Status code of the write operation.
    pub status_code: u32,
}

impl WriteResult {
    /// Creates a successful write result.
    pub fn success(node_id: NodeId) -> Self {
        Self {
            node_id,
            status_code: 0,
        }
    }

    /// Creates a failed write result.
    pub fn failure(node_id: NodeId, status_code: u32) -> Self {
        Self {
            node_id,
            status_code,
        }
    }

    /// Returns `true` if the write was accepted.
    #[inline]
    pub fn is_good(&self) -> bool {
        status_is_good(self.status_code)
    }

    /// Converts a rejected write into an error.
    pub fn into_result(self) -> OpcUaResult<()> {
        if self.is_good() {
            Ok(())
        } else {
            Err(OpcUaError::operation(OperationError::write_rejected(
                self.node_id.to_string(),
                self.status_code,
            )))
        }
    }
}

// =============================================================================
// OpcUaValue
// =============================================================================

/// OPC UA value type for the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum OpcUaValue {
    /// Boolean value.
    Boolean(bool),

    /// Signed byte.
    SByte(i8),

    /// Unsigned byte.
    Byte(u8),

    /// 16-bit signed integer.
    Int16(i16),

    /// 16-bit unsigned integer.
    UInt16(u16),

    /// 32-bit signed integer.
    Int32(i32),

    /// 32-bit unsigned integer.
    UInt32(u32),

    /// 64-bit signed integer.
    Int64(i64),

    /// 64-bit unsigned integer.
    UInt64(u64),

    /// 32-bit float.
    Float(f32),

    /// 64-bit double.
    Double(f64),

    /// String value.
    String(String),

    /// Date/time value.
    DateTime(chrono::DateTime<chrono::Utc>),

    /// GUID value.
    Guid(uuid::Uuid),

    /// Byte string.
    ByteString(Vec<u8>),

    /// Array of values.
    Array(Vec<OpcUaValue>),

    /// Null value.
    #[default]
    Null,
}

impl OpcUaValue {
    /// Returns the OPC UA type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "Boolean",
            Self::SByte(_) => "SByte",
            Self::Byte(_) => "Byte",
            Self::Int16(_) => "Int16",
            Self::UInt16(_) => "UInt16",
            Self::Int32(_) => "Int32",
            Self::UInt32(_) => "UInt32",
            Self::Int64(_) => "Int64",
            Self::UInt64(_) => "UInt64",
            Self::Float(_) => "Float",
            Self::Double(_) => "Double",
            Self::String(_) => "String",
            Self::DateTime(_) => "DateTime",
            Self::Guid(_) => "Guid",
            Self::ByteString(_) => "ByteString",
            Self::Array(_) => "Array",
            Self::Null => "Null",
        }
    }

    /// Returns `true` if this is a null value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Attempts to get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => self.as_i64().map(|v| v != 0),
        }
    }

    /// Attempts to get the value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::SByte(v) => Some(*v as i64),
            Self::Byte(v) => Some(*v as i64),
            Self::Int16(v) => Some(*v as i64),
            Self::UInt16(v) => Some(*v as i64),
            Self::Int32(v) => Some(*v as i64),
            Self::UInt32(v) => Some(*v as i64),
            Self::Int64(v) => Some(*v),
            Self::UInt64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Attempts to get the value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v as f64),
            Self::Double(v) => Some(*v),
            Self::UInt64(v) => Some(*v as f64),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    /// Attempts to get the value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Attempts to get the value as an array.
    pub fn as_array(&self) -> Option<&[OpcUaValue]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for OpcUaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{}", v),
            Self::SByte(v) => write!(f, "{}", v),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Int16(v) => write!(f, "{}", v),
            Self::UInt16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::UInt32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::UInt64(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:?}", v),
            Self::Double(v) => write!(f, "{:?}", v),
            Self::String(v) => write!(f, "{}", v),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Guid(v) => write!(f, "{}", v),
            Self::ByteString(v) => write!(f, "<{} bytes>", v.len()),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Self::Null => write!(f, "null"),
        }
    }
}

// =============================================================================
// BrowseResult
// =============================================================================

/// One child reference returned by a browse.
#[derive(Debug, Clone)]
pub struct BrowseResult {
    /// The node ID of the child.
    pub node_id: NodeId,

    /// Browse name.
    pub browse_name: String,

    /// Display name.
    pub display_name: String,

    /// Node class bit value.
    pub node_class: u32,

    /// Reference type (e.g., HasComponent, Organizes).
    pub reference_type: Option<NodeId>,

    /// Type definition node.
    pub type_definition: Option<NodeId>,
}

impl BrowseResult {
    /// Creates a browse result with only the child node id filled in.
    pub fn child(node_id: NodeId) -> Self {
        let name = node_id.label();
        Self {
            node_id,
            browse_name: name.clone(),
            display_name: name,
            node_class: 0,
            reference_type: None,
            type_definition: None,
        }
    }
}

// =============================================================================
// OpcUaTransport Trait
// =============================================================================

/// Abstract transport trait for OPC UA communication.
///
/// Every call is a single request/response; implementations must not retry.
/// Implementations must be `Send + Sync` so a transport can be driven from
/// any task.
#[async_trait]
pub trait OpcUaTransport: Send + Sync {
    // =========================================================================
    // Connection Management
    // =========================================================================

    /// Establishes a session with the OPC UA server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    async fn connect(&mut self) -> OpcUaResult<()>;

    /// Closes the session. Calling this while disconnected is a no-op.
    async fn disconnect(&mut self) -> OpcUaResult<()>;

    /// Returns `true` if the transport is currently connected.
    fn is_connected(&self) -> bool;

    /// Returns the current transport state.
    fn state(&self) -> TransportState;

    // =========================================================================
    // Read / Write
    // =========================================================================

    /// Reads the Value attribute of a node.
    async fn read_value(&self, node_id: &NodeId) -> OpcUaResult<ReadResult> {
        self.read_attribute(node_id, AttributeId::Value).await
    }

    /// Reads a specific attribute of a node.
    async fn read_attribute(
        &self,
        node_id: &NodeId,
        attribute_id: AttributeId,
    ) -> OpcUaResult<ReadResult>;

    /// Writes the Value attribute of a node.
    async fn write_value(&self, node_id: &NodeId, value: OpcUaValue) -> OpcUaResult<WriteResult>;

    // =========================================================================
    // Browse
    // =========================================================================

    /// Returns every forward hierarchical child reference of a node.
    async fn browse(&self, node_id: &NodeId) -> OpcUaResult<Vec<BrowseResult>>;

    /// Returns the direct children of a node in server order.
    async fn children(&self, node_id: &NodeId) -> OpcUaResult<Vec<NodeId>> {
        let refs = self.browse(node_id).await?;
        Ok(refs.into_iter().map(|r| r.node_id).collect())
    }

    // =========================================================================
    // Derived Queries
    // =========================================================================

    /// Reads the server NamespaceArray.
    async fn namespace_array(&self) -> OpcUaResult<Vec<String>> {
        let value = self.read_value(&NodeId::NAMESPACE_ARRAY).await?.into_value()?;
        let items = value.as_array().ok_or_else(|| {
            OpcUaError::operation(OperationError::unexpected_response(
                NodeId::NAMESPACE_ARRAY.to_string(),
                format!("expected an array of strings, got {}", value.type_name()),
            ))
        })?;

        Ok(items
            .iter()
            .map(|item| item.as_str().map(str::to_string).unwrap_or_default())
            .collect())
    }

    /// Resolves a namespace URI to its index on this server.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NamespaceNotFound`] if the URI is not in the
    /// server NamespaceArray.
    async fn namespace_index(&self, uri: &str) -> OpcUaResult<u16> {
        let namespaces = self.namespace_array().await?;
        namespaces
            .iter()
            .position(|ns| ns == uri)
            .and_then(|idx| u16::try_from(idx).ok())
            .ok_or_else(|| OpcUaError::namespace_not_found(uri))
    }

    /// Reads the AccessLevel attribute of a node.
    async fn access_level(&self, node_id: &NodeId) -> OpcUaResult<AccessLevel> {
        let value = self
            .read_attribute(node_id, AttributeId::AccessLevel)
            .await?
            .into_value()?;

        value
            .as_i64()
            .and_then(|bits| u8::try_from(bits).ok())
            .map(AccessLevel::from_bits)
            .ok_or_else(|| {
                OpcUaError::operation(OperationError::unexpected_response(
                    node_id.to_string(),
                    format!("AccessLevel must be a Byte, got {}", value.type_name()),
                ))
            })
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Returns a display name for this transport.
    fn display_name(&self) -> String;

    /// Returns the endpoint URL.
    fn endpoint(&self) -> &str;

    /// Returns the configuration.
    fn config(&self) -> &OpcUaConfig;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_state() {
        assert!(TransportState::Connected.is_connected());
        assert!(!TransportState::Disconnected.is_connected());
        assert_eq!(TransportState::Failed.to_string(), "Failed");
    }

    #[test]
    fn test_read_result_status() {
        let success = ReadResult::success(NodeId::string(2, "v4"), OpcUaValue::Double(25.5));
        assert!(success.is_good());
        assert!(!success.is_bad());

        let failure = ReadResult::failure(NodeId::string(2, "v4"), 0x8034_0000);
        assert!(failure.is_bad());
        assert!(!failure.is_good());

        let uncertain = ReadResult {
            status_code: 0x4000_0000,
            ..ReadResult::success(NodeId::string(2, "v4"), OpcUaValue::Int32(1))
        };
        assert!(uncertain.is_uncertain());
        assert!(!uncertain.is_bad());
    }

    #[test]
    fn test_read_result_into_value() {
        let value = ReadResult::success(NodeId::string(2, "v1"), OpcUaValue::Int32(7))
            .into_value()
            .unwrap();
        assert_eq!(value, OpcUaValue::Int32(7));

        let error = ReadResult::failure(NodeId::string(2, "v9"), 0x8034_0000)
            .into_value()
            .unwrap_err();
        assert!(error.to_string().contains("BadNodeIdUnknown"));
    }

    #[test]
    fn test_write_result_into_result() {
        assert!(WriteResult::success(NodeId::string(2, "v4")).into_result().is_ok());

        let error = WriteResult::failure(NodeId::string(2, "v1"), 0x803B_0000)
            .into_result()
            .unwrap_err();
        assert!(matches!(
            error,
            OpcUaError::Operation(OperationError::NotWritable { .. })
        ));
    }

    #[test]
    fn test_opcua_value_accessors() {
        assert_eq!(OpcUaValue::Boolean(true).as_bool(), Some(true));
        assert_eq!(OpcUaValue::Int32(42).as_i64(), Some(42));
        assert_eq!(OpcUaValue::Int32(42).as_f64(), Some(42.0));
        assert_eq!(OpcUaValue::Byte(3).as_i64(), Some(3));
        assert_eq!(OpcUaValue::String("x".into()).as_f64(), None);
        assert!(OpcUaValue::Null.is_null());
    }

    #[test]
    fn test_opcua_value_display() {
        assert_eq!(OpcUaValue::Double(50.0).to_string(), "50.0");
        assert_eq!(OpcUaValue::Int32(3).to_string(), "3");
        assert_eq!(OpcUaValue::Boolean(false).to_string(), "false");
        assert_eq!(
            OpcUaValue::String("Hello World times 2".into()).to_string(),
            "Hello World times 2"
        );
        assert_eq!(
            OpcUaValue::Array(vec![OpcUaValue::Int32(1), OpcUaValue::Int32(2)]).to_string(),
            "[1, 2]"
        );
    }

    #[test]
    fn test_browse_result_child() {
        let child = BrowseResult::child(NodeId::string(2, "v1"));
        assert_eq!(child.browse_name, "v1");
        assert_eq!(child.node_id, NodeId::string(2, "v1"));
    }
}
