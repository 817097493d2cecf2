// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA client utilities for opcscope.
//!
//! Two small tools built on a single transport seam:
//!
//! - **Traversal**: collect every node under a root, bounded by a count
//! - **Probe**: resolve a namespace, read variables, write one and read it back
//!
//! Both run inside a [`ScopedConnection`], which connects a transport, runs
//! one body and always disconnects afterwards.
//!
//! # Features
//!
//! - `real-transport`: [`client::RealOpcUaTransport`] on top of the `opcua`
//!   crate. Without it only the [`client::OpcUaTransport`] trait is available,
//!   which is enough for tests and alternative backends.
//!
//! # Error Handling
//!
//! ```text
//! OpcUaError
//! ├── Connection    - Endpoint discovery, session and disconnect failures
//! ├── Browse        - Child enumeration failures
//! ├── Operation     - Read/write failures and bad status codes
//! ├── Configuration - Invalid settings and node identifiers
//! └── Timeout       - Request and overall deadline expiry
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use opcscope_opcua::{traverse, NodeId, OpcUaConfig, RealOpcUaTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = RealOpcUaTransport::new(OpcUaConfig::default());
//!     let report = traverse::run_scoped(
//!         transport,
//!         NodeId::OBJECTS_FOLDER,
//!         traverse::TraversalOptions::default(),
//!         None,
//!     )
//!     .await?;
//!
//!     println!("we found {} nodes in {:?}", report.count(), report.elapsed);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod probe;
pub mod traverse;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{
    BrowseError, ConfigurationError, ConnectionError, ErrorCode, ErrorSeverity, OpcUaError,
    OpcUaResult, OperationError, TimeoutError,
};

pub use types::{
    AccessLevel, AttributeId, NodeId, NodeIdentifier, OpcUaConfig, OpcUaConfigBuilder,
    SecurityMode, SecurityPolicy, UserTokenType,
};

pub use client::{
    BrowseResult, OpcUaTransport, OpcUaValue, ReadResult, ScopeFuture, ScopedConnection,
    TransportState, WriteResult,
};

#[cfg(feature = "real-transport")]
pub use client::RealOpcUaTransport;

pub use probe::{ProbeEvent, ProbePlan, ProbeReport, ValueRecord};
pub use traverse::{
    collect_all_under, TraversalOptions, TraversalReport, VisitPolicy, WorkListOrder,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
