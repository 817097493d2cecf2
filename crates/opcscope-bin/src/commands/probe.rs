// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `probe` command.

use opcscope_config::ScopeConfig;
use opcscope_opcua::probe::{self, ProbeEvent};
use opcscope_opcua::RealOpcUaTransport;
use tracing::{info, warn};

use crate::cli::{Cli, OutputFormat, ProbeArgs};
use crate::error::BinResult;

/// Executes the `probe` command.
pub async fn probe(_cli: &Cli, mut config: ScopeConfig, args: ProbeArgs) -> BinResult<()> {
    if let Some(uri) = args.namespace_uri {
        config.probe.namespace_uri = uri;
    }
    if !args.nodes.is_empty() {
        config.probe.nodes = args.nodes;
    }
    if let Some(target) = args.target {
        config.probe.target = target;
    }
    if let Some(value) = args.value {
        config.probe.write_value = value;
    }
    config.probe.validate()?;

    run(&config, args.format).await
}

/// Connects, runs the probe sequence and prints each step or the report.
pub async fn run(config: &ScopeConfig, format: OutputFormat) -> BinResult<()> {
    let plan = config.probe_plan()?;
    let transport = RealOpcUaTransport::new(config.to_opcua_config()?);

    if format == OutputFormat::Text {
        println!("Connecting to {} ...", config.connection.endpoint);
    }
    info!(
        endpoint = %config.connection.endpoint,
        namespace = %plan.namespace_uri,
        target = %plan.target,
        "Starting probe"
    );

    let on_event = move |event: &ProbeEvent| {
        if format == OutputFormat::Text {
            println!("{}", event);
        }
    };
    let report = probe::run_scoped(transport, plan, config.deadline(), on_event).await?;

    if !report.write_confirmed() {
        warn!(
            written = %report.written,
            read_back = %report.after,
            "Read-back value differs from the written value"
        );
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
