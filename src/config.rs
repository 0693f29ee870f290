//! Configuration loading with per-field defaults
//!
//! Every field has a default so the tool runs with no config file at all.
//! An optional TOML file (default location under the platform data dir,
//! overridable with `--config`) can adjust any subset of fields.

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::FailurePolicy;

/// Get the per-user data directory for cookie and catalog files
pub fn data_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "gfs-orders", "gfs-orders")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow!("Could not determine home directory"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalConfig,
    /// Single-line cookie file holding the persisted session
    pub cookie_file: PathBuf,
    /// Append-only item code -> description catalog
    pub items_file: PathBuf,
    /// What to do when a single order-detail fetch fails
    pub on_error: FailurePolicy,
    pub login: LoginConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub base_url: String,
    /// Read-only endpoint used to test whether a session is still live
    pub probe_path: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// Helper command that opens a browser, waits for the user to log in,
    /// and prints the captured cookies (one `name=value` per line) to stdout
    pub command: String,
}

impl Default for Config {
    fn default() -> Self {
        let dir = data_dir().unwrap_or_else(|_| PathBuf::from(".gfs-orders"));
        Self {
            portal: PortalConfig::default(),
            cookie_file: dir.join("cookie.txt"),
            items_file: dir.join("gfs_items.json"),
            on_error: FailurePolicy::Abort,
            login: LoginConfig::default(),
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://order.gfs.com".to_string(),
            probe_path: "/us-east1/api/v6/orders".to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            command: "gfs-login-helper".to_string(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location if present,
    /// falling back to defaults when no file exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match data_dir() {
                Ok(dir) => dir.join("config.toml"),
                Err(_) => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}
