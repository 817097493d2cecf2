// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Reads `ns=2;s=v1` .. `v4` in namespace `urn:simple-server` on
//! `opc.tcp://localhost:4840`, writes `50.0` to `v4` and reads it back.

use opcscope_bin::cli::{LogFormat, OutputFormat};
use opcscope_bin::commands::probe;
use opcscope_bin::{init_logging, report_error_and_exit};
use opcscope_config::ScopeConfig;

#[tokio::main]
async fn main() {
    init_logging("warn", LogFormat::Text);

    if let Err(e) = probe::run(&ScopeConfig::default(), OutputFormat::Text).await {
        report_error_and_exit(e);
    }
}
