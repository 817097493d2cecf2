// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # opcscope-bin
//!
//! Command line front ends for the opcscope utilities.
//!
//! - `opcscope`: configurable CLI with `traverse`, `probe`, `validate` and
//!   `version` subcommands
//! - `collect-nodes`: traversal with built-in defaults, no flags
//! - `rw-probe`: read/write probe with built-in defaults, no flags
//!
//! ## Architecture
//!
//! ```text
//!   main.rs / bin/*.rs
//!          │
//!    ┌─────▼─────┐
//!    │  cli.rs   │  clap parsing
//!    └─────┬─────┘
//!          │ resolve_config (file, env, --endpoint)
//!    ┌─────▼─────┐     ┌────────────┐
//!    │ commands  │────►│ logging.rs │
//!    └─────┬─────┘     └────────────┘
//!          │
//!   ┌──────▼─────────┐
//!   │ opcscope-opcua │  ScopedConnection, traverse, probe
//!   └────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Traverse from the Objects folder (default command)
//! opcscope
//!
//! # Breadth-first, skipping revisits, as JSON
//! opcscope traverse --root "ns=2;s=Plant" --order queue --dedup --format json
//!
//! # Probe another server
//! opcscope -e opc.tcp://plc.local:4840 probe --target "ns=2;s=v1" --value 12.5
//!
//! # Validate configuration
//! opcscope -c scope.yaml validate --show-config
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{report_error_and_exit, BinError, BinResult};
pub use logging::init_logging;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Resolves configuration, initializes logging and runs the selected command.
pub async fn run(cli: Cli) -> BinResult<()> {
    let config = commands::resolve_config(&cli)?;

    let level = cli.effective_log_level(config.logging.level.as_str());
    let format = cli.log_format.unwrap_or_else(|| config.logging.format.into());
    init_logging(level, format);

    commands::execute(cli, config).await
}
