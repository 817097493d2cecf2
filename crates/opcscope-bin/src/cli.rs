// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `traverse`: Collect every node under a root (default)
//! - `probe`: Read variables, write one and read it back
//! - `validate`: Validate a configuration file
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use opcscope_opcua::traverse::WorkListOrder;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// opcscope - OPC UA address space explorer
///
/// Walks the address space of an OPC UA server and probes reads and writes
/// against individual variables.
#[derive(Parser, Debug)]
#[command(
    name = "opcscope",
    author = "Sylvex <contact@sylvex.io>",
    version = crate::VERSION,
    about = "OPC UA address space traversal and read/write probe",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path (built-in defaults when omitted)
    #[arg(short, long, env = "OPCSCOPE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "OPCSCOPE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server endpoint, overrides the configuration
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the opcscope CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Collect every node under a root
    ///
    /// This is the default command when no subcommand is specified.
    Traverse(TraverseArgs),

    /// Read a set of variables, write one and read it back
    Probe(ProbeArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration without connecting.
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `traverse` command.
#[derive(Args, Debug, Default, Clone)]
pub struct TraverseArgs {
    /// Root node id (e.g. i=85 or ns=2;s=Plant)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Maximum number of nodes to collect
    #[arg(short = 'm', long)]
    pub max_count: Option<usize>,

    /// Work list order
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Skip nodes that were already visited
    #[arg(long)]
    pub dedup: bool,

    /// Number of nodes printed after the summary
    #[arg(short, long)]
    pub preview: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `probe` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ProbeArgs {
    /// Namespace URI to resolve
    #[arg(long)]
    pub namespace_uri: Option<String>,

    /// Node to read (repeatable, replaces the configured list)
    #[arg(short, long = "node")]
    pub nodes: Vec<String>,

    /// Node to write
    #[arg(short, long)]
    pub target: Option<String>,

    /// Value written to the target (Double)
    #[arg(long, allow_negative_numbers = true)]
    pub value: Option<f64>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Show the effective configuration
    #[arg(long)]
    pub show_config: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

// =============================================================================
// Value Enums
// =============================================================================

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for log aggregation
    Json,
    /// Compact single-line format
    Compact,
}

impl From<opcscope_config::LogFormat> for LogFormat {
    fn from(format: opcscope_config::LogFormat) -> Self {
        match format {
            opcscope_config::LogFormat::Text => Self::Text,
            opcscope_config::LogFormat::Json => Self::Json,
            opcscope_config::LogFormat::Compact => Self::Compact,
        }
    }
}

/// Report output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Console text
    #[default]
    Text,
    /// Serialized report
    Json,
}

/// Work list order as a CLI value.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    /// Last pushed, first visited
    Stack,
    /// Breadth-first
    Queue,
}

impl From<OrderArg> for WorkListOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Stack => WorkListOrder::Stack,
            OrderArg::Queue => WorkListOrder::Queue,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the command to execute, defaulting to `traverse`.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Traverse(TraverseArgs::default()))
    }

    /// Returns the log level, honouring `--quiet` and `--verbose`.
    ///
    /// `fallback` is used when no level was given on the command line.
    pub fn effective_log_level<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(fallback)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["opcscope"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Traverse(_)));
    }

    #[test]
    fn test_traverse_command() {
        let cli = Cli::parse_from([
            "opcscope", "traverse", "--root", "ns=2;s=Plant", "--max-count", "100", "--order",
            "queue", "--dedup", "--format", "json",
        ]);
        match cli.command {
            Some(Commands::Traverse(args)) => {
                assert_eq!(args.root.as_deref(), Some("ns=2;s=Plant"));
                assert_eq!(args.max_count, Some(100));
                assert_eq!(args.order, Some(OrderArg::Queue));
                assert!(args.dedup);
                assert_eq!(args.format, OutputFormat::Json);
            }
            _ => panic!("Expected Traverse command"),
        }
    }

    #[test]
    fn test_probe_command() {
        let cli = Cli::parse_from([
            "opcscope", "probe", "--node", "ns=2;s=v1", "--node", "ns=2;s=v2", "--target",
            "ns=2;s=v2", "--value", "-1.5",
        ]);
        match cli.command {
            Some(Commands::Probe(args)) => {
                assert_eq!(args.nodes, vec!["ns=2;s=v1", "ns=2;s=v2"]);
                assert_eq!(args.target.as_deref(), Some("ns=2;s=v2"));
                assert_eq!(args.value, Some(-1.5));
                assert_eq!(args.format, OutputFormat::Text);
            }
            _ => panic!("Expected Probe command"),
        }
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["opcscope", "validate", "--show-config"]);
        match cli.command {
            Some(Commands::Validate(args)) => assert!(args.show_config),
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "opcscope", "probe", "-c", "scope.yaml", "-e", "opc.tcp://plc:4840",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("scope.yaml")));
        assert_eq!(cli.endpoint.as_deref(), Some("opc.tcp://plc:4840"));
    }

    #[test]
    fn test_effective_log_level() {
        let cli = Cli::parse_from(["opcscope"]);
        assert_eq!(cli.effective_log_level("info"), "info");

        let cli = Cli::parse_from(["opcscope", "--log-level", "trace"]);
        assert_eq!(cli.effective_log_level("info"), "trace");

        let cli = Cli::parse_from(["opcscope", "-q", "--log-level", "trace"]);
        assert_eq!(cli.effective_log_level("info"), "warn");

        let cli = Cli::parse_from(["opcscope", "-v"]);
        assert_eq!(cli.effective_log_level("info"), "debug");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["opcscope", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_order_conversion() {
        assert_eq!(WorkListOrder::from(OrderArg::Stack), WorkListOrder::Stack);
        assert_eq!(WorkListOrder::from(OrderArg::Queue), WorkListOrder::Queue);
    }
}
