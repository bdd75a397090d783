// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use murmur_config::{resolve_config_path, AppConfig, DEFAULT_CONFIG_NAME};
use tracing::{instrument, Level};

use crate::{broadcast, genkey, run};

#[derive(Parser, Debug)]
#[command(name = "murmur")]
#[command(about = "A push-based epidemic gossip broadcast node", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Path to a murmur.config.yaml file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity; repeat for more (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a gossip node: binds the HTTP server and serves ingress traffic
    Run,
    /// Originate a broadcast against a running node
    Broadcast {
        /// Base URL of the node to broadcast through, e.g. http://127.0.0.1:8080
        #[arg(long)]
        node: String,
        /// The message key
        #[arg(long)]
        key: String,
        /// The message value
        #[arg(long)]
        value: String,
    },
    /// Generate a new Ed25519 keypair and print it
    Genkey,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Run => {
                let config_path = resolve_config_path(
                    murmur_config::find_in_parent,
                    std::env::current_dir()?,
                    PathBuf::from("."),
                    DEFAULT_CONFIG_NAME,
                    self.config.map(PathBuf::from),
                );
                let config = AppConfig::load(&config_path)?;
                run::run(config).await?;
            }
            Commands::Broadcast { node, key, value } => {
                broadcast::run(&node, key.as_bytes(), value.as_bytes()).await?;
            }
            Commands::Genkey => {
                genkey::run();
            }
        }
        Ok(())
    }
}
