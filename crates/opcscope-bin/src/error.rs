// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the opcscope binaries.

use opcscope_config::ConfigError;
use opcscope_opcua::OpcUaError;
use thiserror::Error;

/// Result type alias for opcscope-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the opcscope binaries.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Runtime error.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Config loading or validation error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// OPC UA client error.
    #[error("OPC UA error [{code}]: {0}", code = .0.error_code())]
    OpcUa(#[from] OpcUaError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// The context description.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a runtime error.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Creates an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Adds context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the exit code for this error.
    ///
    /// | Code | Meaning |
    /// |------|---------|
    /// | 1 | configuration |
    /// | 2 | connection |
    /// | 3 | browse, read, write or namespace lookup |
    /// | 4 | timeout |
    /// | 5 | I/O |
    /// | 6 | other runtime failure |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 1,
            Self::Config(e) if e.is_io_error() => 5,
            Self::Config(_) => 1,
            Self::OpcUa(e) => match e {
                OpcUaError::Configuration(_) => 1,
                OpcUaError::Connection(_) => 2,
                OpcUaError::Browse(_) | OpcUaError::Operation(_) => 3,
                OpcUaError::Timeout(_) => 4,
            },
            Self::Io(_) => 5,
            Self::Runtime(_) => 6,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }

    /// Returns recovery hints from the underlying client error, if any.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::OpcUa(e) => e.recovery_hints(),
            Self::WithContext { source, .. } => source.recovery_hints(),
            _ => Vec::new(),
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BinError {
    fn from(err: serde_json::Error) -> Self {
        Self::Runtime(format!("failed to serialize report: {}", err))
    }
}

impl From<anyhow::Error> for BinError {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(err.to_string())
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Reports an error with its cause chain and recovery hints on stderr.
pub fn report_error(error: &BinError) {
    let mut chain = error_chain(error).into_iter();
    if let Some(headline) = chain.next() {
        eprintln!("Error: {}", headline);
    }
    for cause in chain {
        eprintln!("  Caused by: {}", cause);
    }

    let hints = error.recovery_hints();
    if !hints.is_empty() {
        eprintln!();
        eprintln!("Hints:");
        for hint in hints {
            eprintln!("  - {}", hint);
        }
    }
}

/// Returns the error message followed by each cause.
///
/// A cause whose text already ends the previous line is skipped.
pub fn error_chain(error: &BinError) -> Vec<String> {
    let mut lines = vec![error.to_string()];
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !lines.last().is_some_and(|prev| prev.ends_with(&text)) {
            lines.push(text);
        }
        source = cause.source();
    }
    lines
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_creation() {
        let err = BinError::config("test error");
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_error_with_context() {
        let err = BinError::config("inner error").with_context("outer context");
        assert_eq!(err.to_string(), "outer context: Configuration error: inner error");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BinError::config("test").exit_code(), 1);
        assert_eq!(BinError::io("test").exit_code(), 5);
        assert_eq!(BinError::runtime("test").exit_code(), 6);
    }

    #[test]
    fn test_client_exit_codes() {
        let refused: BinError = OpcUaError::connection_refused("opc.tcp://localhost:4840").into();
        assert_eq!(refused.exit_code(), 2);

        let missing: BinError = OpcUaError::node_not_found("ns=2;s=v9").into();
        assert_eq!(missing.exit_code(), 3);

        let write: BinError = OpcUaError::write_failed("ns=2;s=v4", "BadNotWritable").into();
        assert_eq!(write.exit_code(), 3);

        let namespace: BinError = OpcUaError::namespace_not_found("urn:simple-server").into();
        assert_eq!(namespace.exit_code(), 3);

        let timeout: BinError = OpcUaError::deadline_exceeded(Duration::from_secs(5)).into();
        assert_eq!(timeout.exit_code(), 4);
    }

    #[test]
    fn test_config_exit_codes() {
        let missing: BinError = ConfigError::file_not_found("scope.yaml").into();
        assert_eq!(missing.exit_code(), 5);

        let invalid: BinError = ConfigError::validation("connection.endpoint", "bad scheme").into();
        assert_eq!(invalid.exit_code(), 1);
    }

    #[test]
    fn test_client_error_display_has_code() {
        let err: BinError = OpcUaError::connection_refused("opc.tcp://localhost:4840").into();
        let text = err.to_string();
        assert!(text.starts_with("OPC UA error [UA-"));
        assert!(!err.recovery_hints().is_empty());
    }

    #[test]
    fn test_client_error_formats_with_code() {
        let err: BinError = OpcUaError::connection_refused("opc.tcp://localhost:4840").into();
        assert_eq!(
            err.to_string(),
            "OPC UA error [UA-0101]: Connection refused to 'opc.tcp://localhost:4840'"
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_error_chain_skips_repeated_causes() {
        let err: BinError = OpcUaError::connection_refused("opc.tcp://localhost:4840").into();
        assert_eq!(
            error_chain(&err),
            vec!["OPC UA error [UA-0101]: Connection refused to 'opc.tcp://localhost:4840'"]
        );

        let wrapped: BinError = BinError::from(OpcUaError::node_not_found("ns=2;s=v9"))
            .with_context("collecting nodes");
        let chain = error_chain(&wrapped);
        assert_eq!(chain.len(), 1);
        assert!(chain[0].starts_with("collecting nodes: OPC UA error [UA-"));
    }

    #[test]
    fn test_error_chain_io_cause_already_in_message() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BinError = ConfigError::io("scope.yaml", io).into();
        let chain = error_chain(&err);
        assert_eq!(chain[0], "Config error: Failed to read config file 'scope.yaml': denied");
        assert_eq!(chain.len(), 1);
        assert_eq!(err.exit_code(), 5);
    }
}
