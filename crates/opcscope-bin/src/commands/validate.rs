// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use opcscope_config::ScopeConfig;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::BinResult;

/// Executes the `validate` command.
///
/// Loading already validated the configuration; this prints a summary and
/// any warnings.
pub fn validate(cli: &Cli, config: &ScopeConfig, args: ValidateArgs) -> BinResult<()> {
    let source = cli
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(built-in defaults)".to_string());
    let warnings = collect_warnings(config);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", source);
            println!();
            println!("Summary:");
            println!("  Endpoint:     {}", config.connection.endpoint);
            println!(
                "  Security:     {} / {}",
                config.connection.security_mode, config.connection.security_policy
            );
            println!("  Root:         {}", config.traverse.root);
            println!("  Max count:    {}", config.traverse.max_count);
            println!("  Order:        {}", config.traverse.order);
            println!("  Namespace:    {}", config.probe.namespace_uri);
            println!("  Probe nodes:  {}", config.probe.nodes.len());
            println!("  Write target: {} <- {}", config.probe.target, config.probe.write_value);

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", serde_json::to_string_pretty(config)?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": source,
                "summary": {
                    "endpoint": config.connection.endpoint,
                    "root": config.traverse.root,
                    "max_count": config.traverse.max_count,
                    "namespace_uri": config.probe.namespace_uri,
                    "probe_nodes": config.probe.nodes.len(),
                    "target": config.probe.target,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(config) } else { None },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Settings that are valid but likely not what the user wants.
fn collect_warnings(config: &ScopeConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.traverse.max_count == 0 {
        warnings.push("traverse.max_count is 0, traversal will return no nodes".to_string());
    }
    if config.traverse.preview > config.traverse.max_count {
        warnings.push(format!(
            "traverse.preview ({}) exceeds traverse.max_count ({})",
            config.traverse.preview, config.traverse.max_count
        ));
    }
    if config.connection.trust_all_certificates {
        warnings.push("connection.trust_all_certificates accepts any server certificate".to_string());
    }
    if !config.probe.nodes.contains(&config.probe.target) {
        warnings.push(format!(
            "probe.target {} is not in probe.nodes, an extra read will be issued",
            config.probe.target
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_no_warnings() {
        assert!(collect_warnings(&ScopeConfig::default()).is_empty());
    }

    #[test]
    fn test_warnings() {
        let mut config = ScopeConfig::default();
        config.traverse.max_count = 0;
        config.connection.trust_all_certificates = true;
        config.probe.target = "ns=2;s=v9".to_string();

        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].contains("max_count is 0"));
    }
}
