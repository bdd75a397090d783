// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use clap::Parser;
use cli::Cli;

mod broadcast;
mod cli;
mod genkey;
mod run;
mod telemetry;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    telemetry::setup_tracing(cli.log_level());

    if let Err(err) = cli.execute().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
