// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_NAME: &str = "murmur.config.yaml";
pub const ENV_PREFIX: &str = "MURMUR_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load configuration: {0}")]
    Load(String),
}

/// A single peer listed in the bootstrap list at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BootstrapPeer {
    pub network: String,
    pub value: String,
}

/// Node configuration, layered defaults < YAML file < `MURMUR_`-prefixed
/// environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Human-readable node name, used in logs.
    pub name: String,
    /// Directory holding the sled database files.
    pub data_dir: PathBuf,
    /// Address this node's server binds to, e.g. "0.0.0.0:8080".
    pub listen_addr: String,
    /// Peers dialed to seed the address book at startup.
    pub bootstrap_peers: Vec<BootstrapPeer>,
    /// Fan-out width (α).
    pub alpha: usize,
    /// Minimum interval, in milliseconds, between accepted requests from the
    /// same source IP.
    pub rate_limit_interval_ms: u64,
    /// Initial backoff delay, in milliseconds, for the client transport.
    pub backoff_initial_delay_ms: u64,
    /// Backoff multiplier applied on each failed send attempt.
    pub backoff_factor: f64,
    /// Backoff delay ceiling, in milliseconds.
    pub backoff_max_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "murmur-node".to_string(),
            data_dir: PathBuf::from("./data"),
            listen_addr: "0.0.0.0:8080".to_string(),
            bootstrap_peers: Vec::new(),
            alpha: 3,
            rate_limit_interval_ms: 1000,
            backoff_initial_delay_ms: 1000,
            backoff_factor: 1.6,
            backoff_max_delay_ms: 60_000,
        }
    }
}

impl AppConfig {
    /// Loads configuration from defaults, overlaid with `config_path` if it
    /// exists, overlaid with `MURMUR_`-prefixed environment variables.
    pub fn load(config_path: &PathBuf) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if config_path.exists() {
            figment = figment.merge(Yaml::file(config_path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));
        figment.extract().map_err(|e| ConfigError::Load(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_when_no_file_and_no_env() {
        Jail::expect_with(|jail| {
            let missing = jail.directory().join("missing.yaml");
            let config = AppConfig::load(&missing).unwrap();
            assert_eq!(config.alpha, 3);
            assert_eq!(config.name, "murmur-node");
            Ok(())
        });
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "murmur.config.yaml",
                r#"
name: "node-a"
alpha: 7
"#,
            )?;
            let path = jail.directory().join("murmur.config.yaml");
            let config = AppConfig::load(&path).unwrap();
            assert_eq!(config.name, "node-a");
            assert_eq!(config.alpha, 7);
            assert_eq!(config.listen_addr, "0.0.0.0:8080");
            Ok(())
        });
    }

    #[test]
    fn env_var_overrides_yaml_file() {
        Jail::expect_with(|jail| {
            jail.create_file("murmur.config.yaml", "alpha: 7\n")?;
            jail.set_env("MURMUR_ALPHA", "12");
            let path = jail.directory().join("murmur.config.yaml");
            let config = AppConfig::load(&path).unwrap();
            assert_eq!(config.alpha, 12);
            Ok(())
        });
    }
}
