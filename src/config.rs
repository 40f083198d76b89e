// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! mmcmd connection configuration
//!
//! Settings come from, in increasing precedence:
//! - built-in defaults
//! - a YAML file named by `MMBATCH_CONFIG`
//! - `MMCMD_*` environment variables
//!
//! There is no default password.
//!
//! # Example config file
//!
//! ```yaml
//! mmcmdPath: /usr/bin/mmcmd
//! server: 192.0.2.10
//! user: administrator
//! password: secret
//! masterServer: ns1.example.com
//! timeoutSecs: 60
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::types::ConfigError;

pub const DEFAULT_MMCMD_PATH: &str = "/usr/bin/mmcmd";
pub const DEFAULT_SERVER: &str = "127.0.0.1";
pub const DEFAULT_USER: &str = "administrator";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_CONFIG_FILE: &str = "MMBATCH_CONFIG";
pub const ENV_MMCMD_PATH: &str = "MMCMD_PATH";
pub const ENV_SERVER: &str = "MMCMD_SERVER";
pub const ENV_USER: &str = "MMCMD_USER";
pub const ENV_PASSWORD: &str = "MMCMD_PASSWORD";
pub const ENV_MASTER_SERVER: &str = "MMCMD_MASTER_SERVER";
pub const ENV_TIMEOUT_SECS: &str = "MMCMD_TIMEOUT_SECS";

/// Settings as they appear in the config file, all optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    pub mmcmd_path: Option<String>,
    pub server: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub master_server: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Read and parse a YAML config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }
}

/// Resolved mmcmd connection settings
#[derive(Clone)]
pub struct MmcmdConfig {
    /// Path to the mmcmd binary
    pub mmcmd_path: String,
    /// Men & Mice central server address
    pub server: String,
    pub user: String,
    pub password: String,
    /// Master server for zones created on demand
    pub master_server: Option<String>,
    /// Limit for a single mmcmd invocation
    pub timeout: Duration,
}

impl fmt::Debug for MmcmdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MmcmdConfig")
            .field("mmcmd_path", &self.mmcmd_path)
            .field("server", &self.server)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("master_server", &self.master_server)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl MmcmdConfig {
    /// Load settings from the process environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var(ENV_CONFIG_FILE) {
            Ok(path) => {
                debug!("reading config file {}", path);
                FileConfig::from_path(Path::new(&path))?
            }
            Err(_) => FileConfig::default(),
        };

        Self::from_lookup(file, |key| std::env::var(key).ok())
    }

    /// Merge file settings with variables from `lookup`
    ///
    /// Empty variables count as unset.
    pub fn from_lookup<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let timeout_secs = match var(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }

        let password = var(ENV_PASSWORD)
            .or(file.password)
            .ok_or(ConfigError::MissingPassword)?;

        Ok(Self {
            mmcmd_path: var(ENV_MMCMD_PATH)
                .or(file.mmcmd_path)
                .unwrap_or_else(|| DEFAULT_MMCMD_PATH.to_string()),
            server: var(ENV_SERVER)
                .or(file.server)
                .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            user: var(ENV_USER)
                .or(file.user)
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
            password,
            master_server: var(ENV_MASTER_SERVER).or(file.master_server),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
