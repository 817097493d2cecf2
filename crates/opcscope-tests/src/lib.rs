// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # opcscope Integration Tests
//!
//! Test utilities and integration tests for the opcscope crates. Everything
//! runs against an in-memory address space; no server is required.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `mocks`: [`MockTransport`](common::mocks::MockTransport), an in-memory
//!     node client with call recording and failure injection
//!   - `builders`: [`AddressSpaceBuilder`](common::builders::AddressSpaceBuilder)
//!   - `fixtures`: Ready-made address spaces and node ids
//!   - `assertions`: Assertion helpers for traversal results and errors
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p opcscope-tests
//!
//! # Run specific test suite
//! cargo test -p opcscope-tests --test integration_traverse
//! cargo test -p opcscope-tests --test integration_probe
//! cargo test -p opcscope-tests --test integration_scoped
//! cargo test -p opcscope-tests --test integration_config
//! ```
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use opcscope_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let mock = MockTransport::new(AddressSpaceFixtures::rabc());
//!     let report = traverse::run_scoped(mock.clone(), NodeFixtures::r(), Default::default(), None)
//!         .await
//!         .unwrap();
//!     assert_eq!(mock.disconnect_count(), 1);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;

    pub use opcscope_opcua::probe::{self, ProbeEvent, ProbePlan};
    pub use opcscope_opcua::traverse::{self, TraversalOptions, VisitPolicy, WorkListOrder};
    pub use opcscope_opcua::{
        AccessLevel, NodeId, OpcUaError, OpcUaTransport, OpcUaValue, ScopedConnection,
    };
}
