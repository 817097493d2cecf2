// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Real OPC UA transport implementation using the `opcua` crate.
//!
//! The `opcua` 0.12 client API is synchronous, so every session call runs on
//! the blocking thread pool via [`tokio::task::spawn_blocking`] and the async
//! executor is never stalled by network I/O.
//!
//! # Example
//!
//! ```rust,ignore
//! use opcscope_opcua::client::{OpcUaTransport, RealOpcUaTransport};
//! use opcscope_opcua::types::OpcUaConfig;
//!
//! let config = OpcUaConfig::builder()
//!     .endpoint("opc.tcp://localhost:4840")
//!     .build()?;
//!
//! let mut transport = RealOpcUaTransport::new(config);
//! transport.connect().await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, trace};

use opcua::client::prelude::*;
use opcua::client::prelude::SecurityPolicy as UaSecurityPolicy;
use opcua::sync::RwLock as OpcUaRwLock;

use crate::client::transport::{
    BrowseResult, OpcUaTransport, OpcUaValue, ReadResult, TransportState, WriteResult,
};
use crate::error::{BrowseError, ConnectionError, OpcUaError, OpcUaResult, OperationError};
use crate::types::{
    AttributeId, NodeId, NodeIdentifier, OpcUaConfig, SecurityMode, SecurityPolicy, UserTokenType,
};

type SharedSession = Arc<OpcUaRwLock<Session>>;

// =============================================================================
// RealOpcUaTransport
// =============================================================================

/// OPC UA transport backed by an `opcua` client session.
pub struct RealOpcUaTransport {
    /// Configuration for the transport.
    config: OpcUaConfig,

    /// Current connection state.
    state: RwLock<TransportState>,

    /// The active session, present only while connected.
    session: RwLock<Option<SharedSession>>,
}

impl RealOpcUaTransport {
    /// Creates a new transport with the given configuration.
    pub fn new(config: OpcUaConfig) -> Self {
        Self {
            config,
            state: RwLock::new(TransportState::Disconnected),
            session: RwLock::new(None),
        }
    }

    fn set_state(&self, state: TransportState) {
        *self.state.write() = state;
    }

    /// Builds the `opcua` client from configuration.
    fn build_client(config: &OpcUaConfig) -> OpcUaResult<Client> {
        let mut builder = ClientBuilder::new()
            .application_name(&config.application_name)
            .application_uri(&config.effective_application_uri())
            .session_retry_limit(0)
            .session_timeout(u32::try_from(config.session_timeout.as_millis()).unwrap_or(u32::MAX));

        if let Some(ref pki_dir) = config.pki_dir {
            builder = builder.pki_dir(pki_dir);
        }

        if config.trust_all_certificates {
            builder = builder.trust_server_certs(true);
        }

        builder.client().ok_or_else(|| {
            OpcUaError::connection(ConnectionError::client_setup(
                "client configuration rejected by the OPC UA stack",
            ))
        })
    }

    fn security_policy(config: &OpcUaConfig) -> UaSecurityPolicy {
        match config.security_policy {
            SecurityPolicy::None => UaSecurityPolicy::None,
            SecurityPolicy::Basic256Sha256 => UaSecurityPolicy::Basic256Sha256,
            SecurityPolicy::Aes128Sha256RsaOaep => UaSecurityPolicy::Aes128Sha256RsaOaep,
            SecurityPolicy::Aes256Sha256RsaPss => UaSecurityPolicy::Aes256Sha256RsaPss,
        }
    }

    fn message_security_mode(config: &OpcUaConfig) -> MessageSecurityMode {
        match config.security_mode {
            SecurityMode::None => MessageSecurityMode::None,
            SecurityMode::Sign => MessageSecurityMode::Sign,
            SecurityMode::SignAndEncrypt => MessageSecurityMode::SignAndEncrypt,
        }
    }

    fn identity_token(config: &OpcUaConfig) -> IdentityToken {
        match &config.user_token {
            UserTokenType::Anonymous => IdentityToken::Anonymous,
            UserTokenType::UserName { username, password } => {
                IdentityToken::UserName(username.clone(), password.clone())
            }
        }
    }

    /// Discovers endpoints, picks the configured one and opens a session.
    fn open_session(config: &OpcUaConfig) -> OpcUaResult<SharedSession> {
        let mut client = Self::build_client(config)?;

        let endpoints = client
            .get_server_endpoints_from_url(config.endpoint.as_str())
            .map_err(|status| {
                debug!(endpoint = %config.endpoint, %status, "Endpoint discovery failed");
                OpcUaError::connection(ConnectionError::refused(&config.endpoint))
            })?;

        let policy = Self::security_policy(config);
        let mode = Self::message_security_mode(config);

        let endpoint = endpoints
            .iter()
            .find(|e| e.security_policy_uri.as_ref() == policy.to_uri() && e.security_mode == mode)
            .cloned()
            .ok_or_else(|| {
                OpcUaError::connection(ConnectionError::no_suitable_endpoint(
                    config.security_mode.name(),
                    config.security_policy.name(),
                ))
            })?;

        debug!(
            security_policy = %endpoint.security_policy_uri,
            security_mode = ?endpoint.security_mode,
            "Found matching endpoint"
        );

        client
            .connect_to_endpoint(endpoint, Self::identity_token(config))
            .map_err(|status| {
                OpcUaError::connection(ConnectionError::session_failed(
                    &config.endpoint,
                    status.to_string(),
                ))
            })
    }

    /// Returns the session, or an error if not connected.
    fn session(&self) -> OpcUaResult<SharedSession> {
        self.session
            .read()
            .clone()
            .ok_or_else(OpcUaError::not_connected)
    }

    /// Runs a blocking session call on the blocking thread pool.
    async fn with_session<F, R>(&self, call: F) -> OpcUaResult<R>
    where
        F: FnOnce(&Session) -> OpcUaResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let session = self.session()?;
        run_blocking(move || {
            let session = session.read();
            call(&session)
        })
        .await
    }
}

async fn run_blocking<F, R>(call: F) -> OpcUaResult<R>
where
    F: FnOnce() -> OpcUaResult<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| OpcUaError::connection(ConnectionError::interrupted(e.to_string())))?
}

// =============================================================================
// Conversions
// =============================================================================

fn to_opcua_node_id(node_id: &NodeId) -> opcua::types::NodeId {
    let ns = node_id.namespace_index;
    match &node_id.identifier {
        NodeIdentifier::Numeric(v) => opcua::types::NodeId::new(ns, *v),
        NodeIdentifier::String(v) => opcua::types::NodeId::new(ns, v.clone()),
        NodeIdentifier::Guid(v) => opcua::types::NodeId::new(ns, opcua::types::Guid::from(*v)),
        NodeIdentifier::Opaque(v) => {
            opcua::types::NodeId::new(ns, opcua::types::ByteString::from(v.as_slice()))
        }
    }
}

fn from_opcua_node_id(node_id: &opcua::types::NodeId) -> NodeId {
    let ns = node_id.namespace;
    match &node_id.identifier {
        opcua::types::Identifier::Numeric(v) => NodeId::numeric(ns, *v),
        opcua::types::Identifier::String(v) => NodeId::string(ns, v.as_ref()),
        opcua::types::Identifier::Guid(v) => {
            NodeId::guid(ns, uuid::Uuid::from_bytes(*v.as_bytes()))
        }
        opcua::types::Identifier::ByteString(v) => {
            NodeId::opaque(ns, v.value.clone().unwrap_or_default())
        }
    }
}

fn to_chrono(dt: &opcua::types::DateTime) -> chrono::DateTime<chrono::Utc> {
    dt.as_chrono()
}

fn from_opcua_variant(variant: &Variant) -> OpcUaValue {
    match variant {
        Variant::Empty => OpcUaValue::Null,
        Variant::Boolean(v) => OpcUaValue::Boolean(*v),
        Variant::SByte(v) => OpcUaValue::SByte(*v),
        Variant::Byte(v) => OpcUaValue::Byte(*v),
        Variant::Int16(v) => OpcUaValue::Int16(*v),
        Variant::UInt16(v) => OpcUaValue::UInt16(*v),
        Variant::Int32(v) => OpcUaValue::Int32(*v),
        Variant::UInt32(v) => OpcUaValue::UInt32(*v),
        Variant::Int64(v) => OpcUaValue::Int64(*v),
        Variant::UInt64(v) => OpcUaValue::UInt64(*v),
        Variant::Float(v) => OpcUaValue::Float(*v),
        Variant::Double(v) => OpcUaValue::Double(*v),
        Variant::String(v) => OpcUaValue::String(v.as_ref().to_string()),
        Variant::DateTime(v) => OpcUaValue::DateTime(to_chrono(v)),
        Variant::Guid(v) => OpcUaValue::Guid(uuid::Uuid::from_bytes(*v.as_bytes())),
        Variant::ByteString(v) => OpcUaValue::ByteString(v.value.clone().unwrap_or_default()),
        Variant::Array(arr) => {
            OpcUaValue::Array(arr.values.iter().map(from_opcua_variant).collect())
        }
        other => OpcUaValue::String(format!("{:?}", other)),
    }
}

fn to_opcua_variant(node_id: &NodeId, value: &OpcUaValue) -> OpcUaResult<Variant> {
    Ok(match value {
        OpcUaValue::Null => Variant::Empty,
        OpcUaValue::Boolean(v) => Variant::Boolean(*v),
        OpcUaValue::SByte(v) => Variant::SByte(*v),
        OpcUaValue::Byte(v) => Variant::Byte(*v),
        OpcUaValue::Int16(v) => Variant::Int16(*v),
        OpcUaValue::UInt16(v) => Variant::UInt16(*v),
        OpcUaValue::Int32(v) => Variant::Int32(*v),
        OpcUaValue::UInt32(v) => Variant::UInt32(*v),
        OpcUaValue::Int64(v) => Variant::Int64(*v),
        OpcUaValue::UInt64(v) => Variant::UInt64(*v),
        OpcUaValue::Float(v) => Variant::Float(*v),
        OpcUaValue::Double(v) => Variant::Double(*v),
        OpcUaValue::String(v) => Variant::String(opcua::types::UAString::from(v.as_str())),
        OpcUaValue::DateTime(v) => Variant::DateTime(Box::new(opcua::types::DateTime::from(*v))),
        OpcUaValue::Guid(v) => Variant::Guid(Box::new(opcua::types::Guid::from(*v))),
        OpcUaValue::ByteString(v) => {
            Variant::ByteString(opcua::types::ByteString::from(v.as_slice()))
        }
        OpcUaValue::Array(items) => {
            let variants = items
                .iter()
                .map(|item| to_opcua_variant(node_id, item))
                .collect::<OpcUaResult<Vec<_>>>()?;
            let array = opcua::types::Array::new(opcua::types::VariantTypeId::Variant, variants)
                .map_err(|status| {
                    OpcUaError::operation(OperationError::write_failed(
                        node_id.to_string(),
                        format!("array encoding rejected: {}", status),
                    ))
                })?;
            Variant::Array(Box::new(array))
        }
    })
}

fn to_read_result(node_id: NodeId, data_value: &DataValue) -> ReadResult {
    let status_code = data_value.status.as_ref().map(|s| s.bits()).unwrap_or(0);
    ReadResult {
        node_id,
        value: data_value.value.as_ref().map(from_opcua_variant),
        status_code,
        server_timestamp: data_value.server_timestamp.as_ref().map(to_chrono),
        source_timestamp: data_value.source_timestamp.as_ref().map(to_chrono),
    }
}

fn has_continuation(point: &ByteString) -> bool {
    point.value.as_ref().is_some_and(|v| !v.is_empty())
}

/// Browses forward hierarchical references, following continuation points.
fn browse_children(
    session: &Session,
    node_id: &NodeId,
) -> OpcUaResult<Vec<ReferenceDescription>> {
    let description = BrowseDescription {
        node_id: to_opcua_node_id(node_id),
        browse_direction: BrowseDirection::Forward,
        reference_type_id: ReferenceTypeId::HierarchicalReferences.into(),
        include_subtypes: true,
        node_class_mask: 0,
        result_mask: BrowseDescriptionResultMask::all().bits(),
    };

    let first = session
        .browse(&[description])
        .map_err(|status| {
            OpcUaError::browse(BrowseError::browse_failed(
                node_id.to_string(),
                status.to_string(),
            ))
        })?
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| {
            OpcUaError::browse(BrowseError::browse_failed(
                node_id.to_string(),
                "No browse results returned",
            ))
        })?;

    if first.status_code.is_bad() {
        let code = first.status_code.bits();
        return Err(if code & 0xFFFF_0000 == 0x8034_0000 {
            OpcUaError::node_not_found(node_id.to_string())
        } else {
            OpcUaError::browse(BrowseError::bad_status(node_id.to_string(), code))
        });
    }

    let mut references = first.references.unwrap_or_default();
    let mut continuation = first.continuation_point;

    while has_continuation(&continuation) {
        trace!(node_id = %node_id, fetched = references.len(), "Following continuation point");

        let next = session
            .browse_next(false, &[continuation])
            .map_err(|status| {
                OpcUaError::browse(BrowseError::browse_failed(
                    node_id.to_string(),
                    status.to_string(),
                ))
            })?
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| {
                OpcUaError::browse(BrowseError::invalid_continuation_point(node_id.to_string()))
            })?;

        if next.status_code.is_bad() {
            return Err(OpcUaError::browse(BrowseError::invalid_continuation_point(
                node_id.to_string(),
            )));
        }

        references.extend(next.references.unwrap_or_default());
        continuation = next.continuation_point;
    }

    Ok(references)
}

// =============================================================================
// OpcUaTransport implementation
// =============================================================================

#[async_trait]
impl OpcUaTransport for RealOpcUaTransport {
    async fn connect(&mut self) -> OpcUaResult<()> {
        self.set_state(TransportState::Connecting);
        info!(endpoint = %self.config.endpoint, "Connecting to OPC UA server");

        let config = self.config.clone();
        match run_blocking(move || Self::open_session(&config)).await {
            Ok(session) => {
                *self.session.write() = Some(session);
                self.set_state(TransportState::Connected);
                info!(endpoint = %self.config.endpoint, "Connected to OPC UA server");
                Ok(())
            }
            Err(e) => {
                self.set_state(TransportState::Failed);
                Err(e)
            }
        }
    }

    async fn disconnect(&mut self) -> OpcUaResult<()> {
        let session = self.session.write().take();

        if let Some(session) = session {
            info!(endpoint = %self.config.endpoint, "Disconnecting from OPC UA server");
            run_blocking(move || {
                session.read().disconnect();
                Ok(())
            })
            .await?;
        }

        self.set_state(TransportState::Disconnected);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.read().is_connected()
    }

    fn state(&self) -> TransportState {
        *self.state.read()
    }

    async fn read_attribute(
        &self,
        node_id: &NodeId,
        attribute_id: AttributeId,
    ) -> OpcUaResult<ReadResult> {
        trace!(node_id = %node_id, attribute = ?attribute_id, "Reading node attribute");

        let target = node_id.clone();
        self.with_session(move |session| {
            let read_value_id = ReadValueId {
                node_id: to_opcua_node_id(&target),
                attribute_id: attribute_id.value(),
                index_range: opcua::types::UAString::null(),
                data_encoding: opcua::types::QualifiedName::null(),
            };

            let results = session
                .read(&[read_value_id], TimestampsToReturn::Both, 0.0)
                .map_err(|status| {
                    OpcUaError::read_failed(target.to_string(), status.to_string())
                })?;

            let data_value = results.first().ok_or_else(|| {
                OpcUaError::operation(OperationError::unexpected_response(
                    target.to_string(),
                    "empty read response",
                ))
            })?;

            Ok(to_read_result(target.clone(), data_value))
        })
        .await
    }

    async fn write_value(&self, node_id: &NodeId, value: OpcUaValue) -> OpcUaResult<WriteResult> {
        trace!(node_id = %node_id, value = %value, "Writing node value");

        let variant = to_opcua_variant(node_id, &value)?;
        let target = node_id.clone();
        self.with_session(move |session| {
            let write_value = WriteValue {
                node_id: to_opcua_node_id(&target),
                attribute_id: AttributeId::Value.value(),
                index_range: opcua::types::UAString::null(),
                value: DataValue::new_now(variant),
            };

            let results = session.write(&[write_value]).map_err(|status| {
                OpcUaError::write_failed(target.to_string(), status.to_string())
            })?;

            let status = results.first().ok_or_else(|| {
                OpcUaError::operation(OperationError::unexpected_response(
                    target.to_string(),
                    "empty write response",
                ))
            })?;

            Ok(WriteResult {
                node_id: target.clone(),
                status_code: status.bits(),
            })
        })
        .await
    }

    async fn browse(&self, node_id: &NodeId) -> OpcUaResult<Vec<BrowseResult>> {
        trace!(node_id = %node_id, "Browsing node");

        let target = node_id.clone();
        let references = self
            .with_session(move |session| browse_children(session, &target))
            .await?;

        Ok(references
            .iter()
            .map(|r| BrowseResult {
                node_id: from_opcua_node_id(&r.node_id.node_id),
                browse_name: r.browse_name.name.as_ref().to_string(),
                display_name: r.display_name.text.as_ref().to_string(),
                node_class: r.node_class as u32,
                reference_type: Some(from_opcua_node_id(&r.reference_type_id)),
                type_definition: Some(from_opcua_node_id(&r.type_definition.node_id)),
            })
            .collect())
    }

    fn display_name(&self) -> String {
        format!("OPC UA ({})", self.config.endpoint)
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn config(&self) -> &OpcUaConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_conversion_round_trip() {
        for node in [
            NodeId::OBJECTS_FOLDER,
            NodeId::string(2, "v4"),
            NodeId::opaque(3, vec![1, 2, 3]),
        ] {
            assert_eq!(from_opcua_node_id(&to_opcua_node_id(&node)), node);
        }
    }

    #[test]
    fn test_variant_conversion() {
        let node = NodeId::string(2, "v4");
        let variant = to_opcua_variant(&node, &OpcUaValue::Double(50.0)).unwrap();
        assert_eq!(from_opcua_variant(&variant), OpcUaValue::Double(50.0));
        assert_eq!(from_opcua_variant(&Variant::Empty), OpcUaValue::Null);
    }

    #[test]
    fn test_new_transport_is_disconnected() {
        let transport = RealOpcUaTransport::new(OpcUaConfig::default());
        assert_eq!(transport.state(), TransportState::Disconnected);
        assert!(!transport.is_connected());
        assert_eq!(transport.endpoint(), "opc.tcp://localhost:4840");
    }

    #[tokio::test]
    async fn test_read_without_session_fails() {
        let transport = RealOpcUaTransport::new(OpcUaConfig::default());
        let error = transport.read_value(&NodeId::string(2, "v1")).await.unwrap_err();
        assert!(matches!(error, OpcUaError::Connection(ConnectionError::NotConnected)));
    }

    #[tokio::test]
    async fn test_disconnect_without_session_is_noop() {
        let mut transport = RealOpcUaTransport::new(OpcUaConfig::default());
        transport.disconnect().await.unwrap();
        assert_eq!(transport.state(), TransportState::Disconnected);
    }
}
