// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! opcscope - OPC UA address space traversal and read/write probe.

use opcscope_bin::{report_error_and_exit, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if let Err(e) = opcscope_bin::run(cli).await {
        report_error_and_exit(e);
    }
}
