// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Collects every node under the Objects folder of `opc.tcp://localhost:4840`
//! and prints a summary with the first ten node ids.

use opcscope_bin::cli::{LogFormat, OutputFormat};
use opcscope_bin::commands::traverse;
use opcscope_bin::{init_logging, report_error_and_exit};
use opcscope_config::ScopeConfig;

#[tokio::main]
async fn main() {
    init_logging("warn", LogFormat::Text);

    if let Err(e) = traverse::run(&ScopeConfig::default(), OutputFormat::Text).await {
        report_error_and_exit(e);
    }
}
