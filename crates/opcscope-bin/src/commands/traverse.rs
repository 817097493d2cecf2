// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `traverse` command.

use std::fmt::Write as _;

use opcscope_config::ScopeConfig;
use opcscope_opcua::traverse::{self, TraversalReport, VisitPolicy};
use opcscope_opcua::RealOpcUaTransport;
use tracing::info;

use crate::cli::{Cli, OutputFormat, TraverseArgs};
use crate::error::BinResult;

/// Executes the `traverse` command.
pub async fn traverse(_cli: &Cli, mut config: ScopeConfig, args: TraverseArgs) -> BinResult<()> {
    if let Some(root) = args.root {
        config.traverse.root = root;
    }
    if let Some(max_count) = args.max_count {
        config.traverse.max_count = max_count;
    }
    if let Some(order) = args.order {
        config.traverse.order = order.into();
    }
    if args.dedup {
        config.traverse.visit = VisitPolicy::Deduplicate;
    }
    if let Some(preview) = args.preview {
        config.traverse.preview = preview;
    }
    config.traverse.validate()?;

    run(&config, args.format).await
}

/// Connects, traverses from the configured root and prints the report.
pub async fn run(config: &ScopeConfig, format: OutputFormat) -> BinResult<()> {
    let root = config.root_node()?;
    let transport = RealOpcUaTransport::new(config.to_opcua_config()?);

    info!(
        endpoint = %config.connection.endpoint,
        root = %root,
        max_count = config.traverse.max_count,
        "Collecting nodes"
    );

    let report = traverse::run_scoped(
        transport,
        root,
        config.traversal_options(),
        config.deadline(),
    )
    .await?;

    match format {
        OutputFormat::Text => print!("{}", render_text(&report, config.traverse.preview)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Renders the summary line followed by the first `preview` nodes.
pub fn render_text(report: &TraversalReport, preview: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "we found {} nodes in {:?} ({:.1} per second)",
        report.count(),
        report.elapsed,
        report.nodes_per_second()
    );
    let _ = writeln!(out, "First {} are:", preview);
    for node in report.preview(preview) {
        let _ = writeln!(out, "{}", node);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use opcscope_opcua::NodeId;

    fn report(count: u32, elapsed: Duration) -> TraversalReport {
        TraversalReport {
            root: NodeId::OBJECTS_FOLDER,
            nodes: (0..count).map(|i| NodeId::numeric(0, 85 + i)).collect(),
            elapsed,
        }
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&report(12, Duration::from_secs(2)), 10);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "we found 12 nodes in 2s (6.0 per second)");
        assert_eq!(lines[1], "First 10 are:");
        assert_eq!(lines[2], "i=85");
        assert_eq!(lines.len(), 12);
    }

    #[test]
    fn test_render_text_short_result() {
        let text = render_text(&report(1, Duration::ZERO), 10);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "we found 1 nodes in 0ns (0.0 per second)");
        assert_eq!(lines.len(), 3);
    }
}
