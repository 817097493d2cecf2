// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA client error types with diagnostics.
//!
//! Every failure raised while talking to a server flows through
//! [`OpcUaError`]. The utilities in this crate never retry or swallow an
//! error; they propagate it to the caller, which reports it and exits.
//!
//! # Error Categories
//!
//! ```text
//! OpcUaError
//! ├── Connection    - Endpoint discovery and session establishment
//! ├── Browse        - Child enumeration failures
//! ├── Operation     - Read/write/namespace failures
//! ├── Configuration - Invalid settings and node identifiers
//! └── Timeout       - Request or deadline expiry
//! ```
//!
//! # Examples
//!
//! ```
//! use opcscope_opcua::error::{ConnectionError, OpcUaError};
//!
//! let error = OpcUaError::connection(ConnectionError::refused(
//!     "opc.tcp://localhost:4840"
//! ));
//!
//! assert_eq!(error.category(), "connection");
//! for hint in error.recovery_hints() {
//!     println!("Hint: {}", hint);
//! }
//! ```

use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

// =============================================================================
// OpcUaError - Main Error Type
// =============================================================================

/// The main error type for OPC UA client operations.
#[derive(Debug, Error)]
pub enum OpcUaError {
    /// Connection and session errors.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Child enumeration errors.
    #[error(transparent)]
    Browse(#[from] BrowseError),

    /// Read/write operation errors.
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// Configuration errors.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Timeout errors.
    #[error(transparent)]
    Timeout(#[from] TimeoutError),
}

impl OpcUaError {
    // =========================================================================
    // Factory Methods
    // =========================================================================

    /// Creates a connection error.
    #[inline]
    pub fn connection(error: ConnectionError) -> Self {
        Self::Connection(error)
    }

    /// Creates a browse error.
    #[inline]
    pub fn browse(error: BrowseError) -> Self {
        Self::Browse(error)
    }

    /// Creates an operation error.
    #[inline]
    pub fn operation(error: OperationError) -> Self {
        Self::Operation(error)
    }

    /// Creates a configuration error.
    #[inline]
    pub fn configuration(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(error: TimeoutError) -> Self {
        Self::Timeout(error)
    }

    /// Creates a connection refused error.
    pub fn connection_refused(endpoint: impl Into<String>) -> Self {
        Self::Connection(ConnectionError::refused(endpoint))
    }

    /// Creates a not connected error.
    pub fn not_connected() -> Self {
        Self::Connection(ConnectionError::NotConnected)
    }

    /// Creates a node not found error.
    pub fn node_not_found(node_id: impl Into<String>) -> Self {
        Self::Browse(BrowseError::node_not_found(node_id))
    }

    /// Creates a read failed error.
    pub fn read_failed(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Operation(OperationError::read_failed(node_id, message))
    }

    /// Creates a write failed error.
    pub fn write_failed(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Operation(OperationError::write_failed(node_id, message))
    }

    /// Creates a namespace not found error.
    pub fn namespace_not_found(uri: impl Into<String>) -> Self {
        Self::Operation(OperationError::namespace_not_found(uri))
    }

    /// Creates a deadline exceeded error.
    pub fn deadline_exceeded(duration: Duration) -> Self {
        Self::Timeout(TimeoutError::deadline(duration))
    }

    // =========================================================================
    // Error Properties
    // =========================================================================

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Connection(e) => e.severity(),
            Self::Browse(e) => e.severity(),
            Self::Operation(e) => e.severity(),
            Self::Timeout(_) => ErrorSeverity::Warning,
            Self::Configuration(_) => ErrorSeverity::Critical,
        }
    }

    /// Returns the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Browse(_) => "browse",
            Self::Operation(_) => "operation",
            Self::Timeout(_) => "timeout",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Connection(e) => e.error_code(),
            Self::Browse(e) => e.error_code(),
            Self::Operation(e) => e.error_code(),
            Self::Timeout(e) => e.error_code(),
            Self::Configuration(e) => e.error_code(),
        }
    }

    /// Returns recovery hints for this error.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::Connection(e) => e.recovery_hints(),
            Self::Browse(e) => e.recovery_hints(),
            Self::Operation(e) => e.recovery_hints(),
            Self::Timeout(e) => e.recovery_hints(),
            Self::Configuration(e) => e.recovery_hints(),
        }
    }

    /// Returns the tracing level for this error.
    pub fn tracing_level(&self) -> Level {
        self.severity().to_tracing_level()
    }

    /// Logs this error with appropriate level and context.
    pub fn log(&self, context: &str) {
        let code = self.error_code();

        match self.tracing_level() {
            Level::ERROR => tracing::error!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
            Level::WARN => tracing::warn!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
            _ => tracing::debug!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
        }
    }
}

// =============================================================================
// ConnectionError
// =============================================================================

/// Connection-related errors.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Connection refused.
    #[error("Connection refused to '{endpoint}'")]
    Refused {
        /// Target endpoint.
        endpoint: String,
    },

    /// Invalid endpoint URL.
    #[error("Invalid endpoint URL: '{url}' - {reason}")]
    InvalidEndpoint {
        /// The invalid URL.
        url: String,
        /// Reason.
        reason: String,
    },

    /// No endpoint matches the configured security settings.
    #[error("No suitable endpoint found with security mode '{security_mode}' and policy '{security_policy}'")]
    NoSuitableEndpoint {
        /// Required security mode.
        security_mode: String,
        /// Required security policy.
        security_policy: String,
    },

    /// Session could not be created or activated.
    #[error("Session could not be established with '{endpoint}': {message}")]
    SessionFailed {
        /// Target endpoint.
        endpoint: String,
        /// Error message.
        message: String,
    },

    /// Client could not be built from the configuration.
    #[error("Failed to build OPC UA client: {message}")]
    ClientSetup {
        /// Error message.
        message: String,
    },

    /// Not connected.
    #[error("Not connected to OPC UA server")]
    NotConnected,

    /// Disconnect failed.
    #[error("Failed to disconnect from '{endpoint}': {message}")]
    DisconnectFailed {
        /// Target endpoint.
        endpoint: String,
        /// Error message.
        message: String,
    },

    /// The blocking worker running a client call panicked or was cancelled.
    #[error("Client worker interrupted: {message}")]
    Interrupted {
        /// Error message.
        message: String,
    },
}

impl ConnectionError {
    /// Creates a connection refused error.
    pub fn refused(endpoint: impl Into<String>) -> Self {
        Self::Refused {
            endpoint: endpoint.into(),
        }
    }

    /// Creates an invalid endpoint error.
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a no suitable endpoint error.
    pub fn no_suitable_endpoint(
        security_mode: impl Into<String>,
        security_policy: impl Into<String>,
    ) -> Self {
        Self::NoSuitableEndpoint {
            security_mode: security_mode.into(),
            security_policy: security_policy.into(),
        }
    }

    /// Creates a session failed error.
    pub fn session_failed(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SessionFailed {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a client setup error.
    pub fn client_setup(message: impl Into<String>) -> Self {
        Self::ClientSetup {
            message: message.into(),
        }
    }

    /// Creates a disconnect failed error.
    pub fn disconnect_failed(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DisconnectFailed {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates an interrupted worker error.
    pub fn interrupted(message: impl Into<String>) -> Self {
        Self::Interrupted {
            message: message.into(),
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotConnected | Self::DisconnectFailed { .. } => ErrorSeverity::Warning,
            Self::ClientSetup { .. } | Self::Interrupted { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Refused { .. } => ErrorCode::new(1, 1),
            Self::InvalidEndpoint { .. } => ErrorCode::new(1, 4),
            Self::NoSuitableEndpoint { .. } => ErrorCode::new(1, 5),
            Self::SessionFailed { .. } => ErrorCode::new(1, 6),
            Self::ClientSetup { .. } => ErrorCode::new(1, 7),
            Self::NotConnected => ErrorCode::new(1, 8),
            Self::DisconnectFailed { .. } => ErrorCode::new(1, 9),
            Self::Interrupted { .. } => ErrorCode::new(1, 10),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::Refused { .. } => vec![
                "Check if the OPC UA server is running",
                "Verify the endpoint URL is correct",
                "Check firewall rules allow the connection",
            ],
            Self::InvalidEndpoint { .. } => vec![
                "Endpoint URLs have the form opc.tcp://host:port[/path]",
            ],
            Self::NoSuitableEndpoint { .. } => vec![
                "List the server endpoints and compare their security settings",
                "Relax security_mode/security_policy or enable them on the server",
            ],
            Self::SessionFailed { .. } => vec![
                "Check the user credentials",
                "Trust the server certificate or enable trust_all_certificates",
            ],
            Self::ClientSetup { .. } => vec![
                "Check that the PKI directory is writable",
            ],
            Self::NotConnected => vec!["Connect before issuing requests"],
            Self::DisconnectFailed { .. } => vec![
                "The server may already have closed the session",
            ],
            Self::Interrupted { .. } => vec!["Check the log for a panic in the OPC UA client"],
        }
    }
}

// =============================================================================
// BrowseError
// =============================================================================

/// Errors raised while enumerating children.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// Node does not exist on the server.
    #[error("Node not found: {node_id}")]
    NodeNotFound {
        /// The node that was not found.
        node_id: String,
    },

    /// The browse service failed.
    #[error("Browse failed for node '{node_id}': {message}")]
    BrowseFailed {
        /// The node being browsed.
        node_id: String,
        /// Error message.
        message: String,
        /// OPC UA status code, if the server returned one.
        status_code: Option<u32>,
    },

    /// A continuation point could not be followed.
    #[error("Invalid continuation point for node '{node_id}'")]
    InvalidContinuationPoint {
        /// The node being browsed.
        node_id: String,
    },
}

impl BrowseError {
    /// Creates a node not found error.
    pub fn node_not_found(node_id: impl Into<String>) -> Self {
        Self::NodeNotFound {
            node_id: node_id.into(),
        }
    }

    /// Creates a browse failed error.
    pub fn browse_failed(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BrowseFailed {
            node_id: node_id.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Creates a browse failed error carrying the server status code.
    pub fn bad_status(node_id: impl Into<String>, status_code: u32) -> Self {
        Self::BrowseFailed {
            node_id: node_id.into(),
            message: OperationError::status_code_name(status_code).to_string(),
            status_code: Some(status_code),
        }
    }

    /// Creates an invalid continuation point error.
    pub fn invalid_continuation_point(node_id: impl Into<String>) -> Self {
        Self::InvalidContinuationPoint {
            node_id: node_id.into(),
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NodeNotFound { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NodeNotFound { .. } => ErrorCode::new(4, 1),
            Self::BrowseFailed { .. } => ErrorCode::new(4, 2),
            Self::InvalidContinuationPoint { .. } => ErrorCode::new(4, 4),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::NodeNotFound { .. } => vec![
                "Verify the root node identifier exists on this server",
                "Use i=85 (Objects folder) as a known starting point",
            ],
            Self::BrowseFailed { .. } => vec![
                "Check that the user may browse this part of the address space",
            ],
            Self::InvalidContinuationPoint { .. } => vec![
                "The server released the continuation point; retry the traversal",
            ],
        }
    }
}

// =============================================================================
// OperationError
// =============================================================================

/// Read, write and namespace resolution errors.
#[derive(Debug, Error)]
pub enum OperationError {
    /// Read failed.
    #[error("Read failed for node '{node_id}': {message}")]
    ReadFailed {
        /// The node being read.
        node_id: String,
        /// Error message.
        message: String,
    },

    /// Write failed.
    #[error("Write failed for node '{node_id}': {message}")]
    WriteFailed {
        /// The node being written.
        node_id: String,
        /// Error message.
        message: String,
        /// OPC UA status code, if the server returned one.
        status_code: Option<u32>,
    },

    /// Bad status code returned by the server.
    #[error("Bad status code {status_code:#010x} ({status_name}) for node '{node_id}'")]
    BadStatus {
        /// The node involved.
        node_id: String,
        /// Raw status code.
        status_code: u32,
        /// Status code name.
        status_name: &'static str,
    },

    /// Node is not writable.
    #[error("Node '{node_id}' is not writable")]
    NotWritable {
        /// The node involved.
        node_id: String,
    },

    /// Namespace URI absent from the server namespace array.
    #[error("Namespace '{uri}' is not registered on the server")]
    NamespaceNotFound {
        /// The namespace URI.
        uri: String,
    },

    /// The server returned something other than what was requested.
    #[error("Unexpected response for node '{node_id}': {message}")]
    UnexpectedResponse {
        /// The node involved.
        node_id: String,
        /// Error message.
        message: String,
    },
}

impl OperationError {
    /// Creates a read failed error.
    pub fn read_failed(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            node_id: node_id.into(),
            message: message.into(),
        }
    }

    /// Creates a write failed error.
    pub fn write_failed(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            node_id: node_id.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Creates a write failed error from a status code.
    ///
    /// Access-denied style codes map to [`OperationError::NotWritable`].
    pub fn write_rejected(node_id: impl Into<String>, status_code: u32) -> Self {
        let node_id = node_id.into();
        match status_code {
            0x803B_0000 | 0x801F_0000 => Self::NotWritable { node_id },
            _ => Self::WriteFailed {
                node_id,
                message: Self::status_code_name(status_code).to_string(),
                status_code: Some(status_code),
            },
        }
    }

    /// Creates a bad status error.
    pub fn bad_status(node_id: impl Into<String>, status_code: u32) -> Self {
        Self::BadStatus {
            node_id: node_id.into(),
            status_code,
            status_name: Self::status_code_name(status_code),
        }
    }

    /// Creates a not writable error.
    pub fn not_writable(node_id: impl Into<String>) -> Self {
        Self::NotWritable {
            node_id: node_id.into(),
        }
    }

    /// Creates a namespace not found error.
    pub fn namespace_not_found(uri: impl Into<String>) -> Self {
        Self::NamespaceNotFound { uri: uri.into() }
    }

    /// Creates an unexpected response error.
    pub fn unexpected_response(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            node_id: node_id.into(),
            message: message.into(),
        }
    }

    /// Returns the human-readable name for an OPC UA status code.
    pub fn status_code_name(code: u32) -> &'static str {
        match code & 0xFFFF_0000 {
            0x0000_0000 => "Good",
            0x8000_0000 => "Bad",
            0x8001_0000 => "BadUnexpectedError",
            0x8002_0000 => "BadInternalError",
            0x8005_0000 => "BadCommunicationError",
            0x800A_0000 => "BadTimeout",
            0x800D_0000 => "BadServerNotConnected",
            0x800E_0000 => "BadServerHalted",
            0x801F_0000 => "BadUserAccessDenied",
            0x8033_0000 => "BadNodeIdInvalid",
            0x8034_0000 => "BadNodeIdUnknown",
            0x8035_0000 => "BadAttributeIdInvalid",
            0x803A_0000 => "BadNotReadable",
            0x803B_0000 => "BadNotWritable",
            0x803C_0000 => "BadOutOfRange",
            0x8074_0000 => "BadTypeMismatch",
            0x804A_0000 => "BadContinuationPointInvalid",
            0x8031_0000 => "BadNoCommunication",
            0x4000_0000 => "Uncertain",
            _ => "Unknown",
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NamespaceNotFound { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ReadFailed { .. } => ErrorCode::new(5, 1),
            Self::WriteFailed { .. } => ErrorCode::new(5, 2),
            Self::BadStatus { .. } => ErrorCode::new(5, 3),
            Self::NotWritable { .. } => ErrorCode::new(5, 5),
            Self::NamespaceNotFound { .. } => ErrorCode::new(5, 9),
            Self::UnexpectedResponse { .. } => ErrorCode::new(5, 10),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::ReadFailed { .. } | Self::BadStatus { .. } => vec![
                "Verify the node identifier and its namespace index",
                "Check that the node is a readable variable",
            ],
            Self::WriteFailed { .. } => vec![
                "Check the data type expected by the node",
                "Verify the value is within the allowed range",
            ],
            Self::NotWritable { .. } => vec![
                "Inspect the node's AccessLevel and UserAccessLevel attributes",
                "Log in as a user with write permission",
            ],
            Self::NamespaceNotFound { .. } => vec![
                "Read the server NamespaceArray (i=2255) to list registered URIs",
                "Check that the expected server application is running",
            ],
            Self::UnexpectedResponse { .. } => vec![
                "The server may not implement this service correctly",
            ],
        }
    }
}

// =============================================================================
// ConfigurationError
// =============================================================================

/// Invalid client settings.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Invalid endpoint URL.
    #[error("Invalid endpoint URL: {url} ({reason})")]
    InvalidEndpoint {
        /// The invalid URL.
        url: String,
        /// Reason.
        reason: String,
    },

    /// Invalid node identifier.
    #[error("Invalid node ID format: {node_id} ({reason})")]
    InvalidNodeId {
        /// The invalid node identifier.
        node_id: String,
        /// Reason.
        reason: String,
    },

    /// Invalid security configuration.
    #[error("Invalid security configuration: {message}")]
    InvalidSecurity {
        /// Error message.
        message: String,
    },

    /// Missing required configuration.
    #[error("Missing required configuration: {field}")]
    MissingField {
        /// Field name.
        field: String,
    },

    /// A field holds a value outside its allowed set.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        /// Field name.
        field: String,
        /// The rejected value.
        value: String,
        /// Reason.
        reason: String,
    },
}

impl ConfigurationError {
    /// Creates an invalid endpoint error.
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid node ID error.
    pub fn invalid_node_id(node_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNodeId {
            node_id: node_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid security error.
    pub fn invalid_security(message: impl Into<String>) -> Self {
        Self::InvalidSecurity {
            message: message.into(),
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidEndpoint { .. } => ErrorCode::new(8, 1),
            Self::InvalidNodeId { .. } => ErrorCode::new(8, 2),
            Self::InvalidSecurity { .. } => ErrorCode::new(8, 3),
            Self::MissingField { .. } => ErrorCode::new(8, 5),
            Self::InvalidValue { .. } => ErrorCode::new(8, 6),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::InvalidEndpoint { .. } => vec![
                "Endpoint URLs must start with opc.tcp://",
            ],
            Self::InvalidNodeId { .. } => vec![
                "Use ns=<index>;i=<number> for numeric identifiers",
                "Use ns=<index>;s=<string> for string identifiers",
                "The ns= prefix may be omitted for namespace 0",
            ],
            Self::InvalidSecurity { .. } => vec![
                "security_mode none requires security_policy none and vice versa",
            ],
            Self::MissingField { .. } => vec!["Add the missing field to the configuration"],
            Self::InvalidValue { .. } => vec!["Check the allowed values for this field"],
        }
    }
}

// =============================================================================
// TimeoutError
// =============================================================================

/// Timeout errors.
#[derive(Debug, Error)]
pub enum TimeoutError {
    /// A single request timed out.
    #[error("Request timed out after {duration:?}")]
    Request {
        /// Timeout duration.
        duration: Duration,
    },

    /// The overall run deadline expired.
    #[error("Deadline of {duration:?} exceeded")]
    Deadline {
        /// Deadline duration.
        duration: Duration,
    },
}

impl TimeoutError {
    /// Creates a request timeout error.
    pub fn request(duration: Duration) -> Self {
        Self::Request { duration }
    }

    /// Creates a deadline exceeded error.
    pub fn deadline(duration: Duration) -> Self {
        Self::Deadline { duration }
    }

    /// Returns the timeout duration.
    pub fn duration(&self) -> Duration {
        match self {
            Self::Request { duration } | Self::Deadline { duration } => *duration,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Request { .. } => ErrorCode::new(9, 6),
            Self::Deadline { .. } => ErrorCode::new(9, 7),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::Request { .. } => vec![
                "Check network latency to the server",
                "Increase the session timeout",
            ],
            Self::Deadline { .. } => vec![
                "Lower max_count or raise the deadline",
            ],
        }
    }
}

// =============================================================================
// ErrorSeverity
// =============================================================================

/// Error severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational - no action required.
    Info,
    /// Warning - action may be required.
    Warning,
    /// Error - action required.
    Error,
    /// Critical - the run cannot proceed.
    Critical,
}

impl ErrorSeverity {
    /// Converts to tracing level.
    pub fn to_tracing_level(self) -> Level {
        match self {
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Critical => Level::ERROR,
        }
    }

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// ErrorCode
// =============================================================================

/// Structured error code.
///
/// Format: `UA-XXYY` where XX is the category and YY the specific error.
///
/// Categories:
/// - 1: Connection
/// - 4: Browse
/// - 5: Operation
/// - 8: Configuration
/// - 9: Timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// Category.
    pub category: u8,
    /// Specific error within category.
    pub code: u8,
}

impl ErrorCode {
    /// Creates a new error code.
    pub const fn new(category: u8, code: u8) -> Self {
        Self { category, code }
    }

    /// Returns the full error code as a u16.
    pub fn as_u16(&self) -> u16 {
        ((self.category as u16) << 8) | (self.code as u16)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UA-{:02X}{:02X}", self.category, self.code)
    }
}

/// Result alias for OPC UA client operations.
pub type OpcUaResult<T> = Result<T, OpcUaError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        let code = ErrorCode::new(1, 5);
        assert_eq!(code.to_string(), "UA-0105");
        assert_eq!(code.as_u16(), 0x0105);
    }

    #[test]
    fn test_error_category() {
        assert_eq!(OpcUaError::not_connected().category(), "connection");
        assert_eq!(OpcUaError::node_not_found("i=85").category(), "browse");
        assert_eq!(
            OpcUaError::namespace_not_found("urn:simple-server").category(),
            "operation"
        );
        assert_eq!(
            OpcUaError::deadline_exceeded(Duration::from_secs(1)).category(),
            "timeout"
        );
    }

    #[test]
    fn test_status_code_names() {
        assert_eq!(OperationError::status_code_name(0), "Good");
        assert_eq!(OperationError::status_code_name(0x8034_0000), "BadNodeIdUnknown");
        assert_eq!(OperationError::status_code_name(0x803B_0000), "BadNotWritable");
        assert_eq!(OperationError::status_code_name(0x1234_0000), "Unknown");
    }

    #[test]
    fn test_write_rejected_maps_access_codes() {
        assert!(matches!(
            OperationError::write_rejected("ns=2;s=v4", 0x803B_0000),
            OperationError::NotWritable { .. }
        ));
        assert!(matches!(
            OperationError::write_rejected("ns=2;s=v4", 0x8074_0000),
            OperationError::WriteFailed {
                status_code: Some(0x8074_0000),
                ..
            }
        ));
    }

    #[test]
    fn test_bad_status_message() {
        let error = OperationError::bad_status("ns=2;s=v9", 0x8034_0000);
        let message = error.to_string();
        assert!(message.contains("ns=2;s=v9"));
        assert!(message.contains("BadNodeIdUnknown"));
    }

    #[test]
    fn test_severity() {
        assert_eq!(
            ConnectionError::NotConnected.severity(),
            ErrorSeverity::Warning
        );
        assert_eq!(
            OpcUaError::namespace_not_found("urn:x").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            OpcUaError::configuration(ConfigurationError::missing_field("endpoint")).severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn test_recovery_hints() {
        let error = ConnectionError::refused("opc.tcp://localhost:4840");
        assert!(error.recovery_hints().iter().any(|h| h.contains("running")));

        let error = ConfigurationError::invalid_node_id("bad;format", "unknown prefix");
        assert!(error.recovery_hints().iter().any(|h| h.contains("ns=")));
    }

    #[test]
    fn test_timeout_duration() {
        let timeout = TimeoutError::deadline(Duration::from_secs(30));
        assert_eq!(timeout.duration(), Duration::from_secs(30));
        assert_eq!(timeout.error_code().to_string(), "UA-0907");
    }

    #[test]
    fn test_wrapper_is_transparent() {
        let error = OpcUaError::connection_refused("opc.tcp://localhost:4840");
        assert_eq!(error.to_string(), "Connection refused to 'opc.tcp://localhost:4840'");
        assert!(std::error::Error::source(&error).is_none());
    }
}
