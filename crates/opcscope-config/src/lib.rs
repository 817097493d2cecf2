// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # opcscope-config
//!
//! Configuration management for the opcscope tools.
//!
//! ## Features
//!
//! - **Schema Definition**: connection, traversal, probe and logging sections
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `OPCSCOPE_*` variables win over file values
//! - **Placeholders**: `${VAR}` and `${VAR:default}` in file content
//!
//! ## Quick Start
//!
//! ```no_run
//! use opcscope_config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load("opcscope.yaml").unwrap();
//! println!("Endpoint: {}", config.connection.endpoint);
//! println!("Root: {}", config.traverse.root);
//! ```
//!
//! ## Configuration Schema
//!
//! - `connection` - Endpoint, security, credentials, session timeout, deadline
//! - `traverse` - Root node, count bound, work list order, revisit policy
//! - `probe` - Namespace URI, nodes to read, write target and value
//! - `logging` - Level and output format
//!
//! Values in config files can reference environment variables:
//!
//! ```yaml
//! connection:
//!   endpoint: "opc.tcp://${PLC_HOST:localhost}:4840"
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use schema::{
    ConnectionConfig, LogFormat, LogLevel, LoggingConfig, ProbeConfig, ScopeConfig, SecretValue,
    TraverseConfig,
};
pub use loader::ConfigLoader;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
