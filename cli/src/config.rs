//! Optional TOML configuration file for defaults the CLI would
//! otherwise ask for on every invocation. Flags always override values
//! loaded here.

use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_mode")]
    pub default_mode: String,
    #[serde(default = "default_port")]
    pub server_port: u16,
}

fn default_mode() -> String {
    "DEFAULT".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            server_port: default_port(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from `path` if it exists, otherwise returns
    /// the defaults. A present-but-unparseable file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
    }
}
