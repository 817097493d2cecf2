// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `traverse`: Collect every node under a root
//! - `probe`: Read variables, write one and read it back
//! - `validate`: Validate configuration file
//! - `version`: Show version information

pub mod probe;
pub mod traverse;
mod validate;
mod version;

pub use validate::validate;
pub use version::version;

use opcscope_config::{ConfigLoader, ScopeConfig};

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli, config: ScopeConfig) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Traverse(args) => traverse::traverse(&cli, config, args).await,
        Commands::Probe(args) => probe::probe(&cli, config, args).await,
        Commands::Validate(args) => validate::validate(&cli, &config, args),
        Commands::Version => version::version(&cli),
    }
}

/// Loads the configuration named on the command line, or the built-in
/// defaults, and applies the global `--endpoint` override.
pub fn resolve_config(cli: &Cli) -> BinResult<ScopeConfig> {
    let mut config = ConfigLoader::new().load_or_default(cli.config.as_deref())?;

    if let Some(endpoint) = &cli.endpoint {
        config.connection.endpoint = endpoint.clone();
        config.connection.validate()?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_resolve_defaults() {
        let cli = Cli::parse_from(["opcscope", "--endpoint", "opc.tcp://plc.local:4841"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.connection.endpoint, "opc.tcp://plc.local:4841");
        assert_eq!(config.traverse.root, "i=85");
    }

    #[test]
    fn test_resolve_rejects_bad_endpoint() {
        let cli = Cli::parse_from(["opcscope", "--endpoint", "http://plc.local"]);
        let err = resolve_config(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_resolve_missing_file() {
        let cli = Cli::parse_from(["opcscope", "--config", "/nonexistent/scope.yaml"]);
        let err = resolve_config(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
