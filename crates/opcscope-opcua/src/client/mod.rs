// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA client plumbing.
//!
//! - **Transport Layer**: the [`OpcUaTransport`] trait every operation runs against
//! - **Scoped Connections**: connect, run one body, always disconnect
//! - **Real Transport**: `opcua`-backed implementation (feature `real-transport`)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              traverse::run_scoped / probe::run_scoped           │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    ScopedConnection                             │
//! │          (connect → body → disconnect, optional deadline)       │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    OpcUaTransport                               │
//! │         (RealOpcUaTransport, or a mock in tests)                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use opcscope_opcua::client::{RealOpcUaTransport, ScopedConnection};
//! use opcscope_opcua::types::{NodeId, OpcUaConfig};
//!
//! let transport = RealOpcUaTransport::new(OpcUaConfig::default());
//! let mut scope = ScopedConnection::new(transport);
//!
//! let children = scope
//!     .run(|t| Box::pin(async move { t.children(&NodeId::OBJECTS_FOLDER).await }))
//!     .await?;
//! ```

mod scoped;
mod transport;

#[cfg(feature = "real-transport")]
mod real_transport;

pub use scoped::{ScopeFuture, ScopedConnection};
pub use transport::{BrowseResult, OpcUaTransport, OpcUaValue, ReadResult, TransportState, WriteResult};

#[cfg(feature = "real-transport")]
pub use real_transport::RealOpcUaTransport;
