//! Run configuration.
//!
//! The root sitemap list and tuning knobs travel in one explicit struct
//! from CLI parse to dispatch; nothing here is process-global. Values can
//! come from a JSON file, with command-line flags layered on top.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything one harvest run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Root sitemap URLs to walk.
    pub roots: Vec<String>,
    /// Concurrent root walks.
    pub workers: usize,
    /// Total fetch attempts per sitemap URL, first try included.
    pub attempts: u32,
    /// Delay between fetch attempts, milliseconds.
    pub retry_delay_ms: u64,
    /// Per-request timeout, seconds.
    pub timeout_secs: u64,
    /// Heartbeat cadence, seconds. 0 disables the heartbeat.
    pub heartbeat_secs: u64,
    /// Where the CSV artifact lands.
    pub out_dir: PathBuf,
    /// Open the artifact with the OS default viewer when done.
    pub open_artifact: bool,
    /// Suppress the heartbeat and spoken cues.
    pub silent: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            workers: 5,
            attempts: 3,
            retry_delay_ms: 1000,
            timeout_secs: 15,
            heartbeat_secs: 10,
            out_dir: PathBuf::from("."),
            open_artifact: true,
            silent: false,
        }
    }
}

impl HarvestConfig {
    /// Default config file location: `~/.siteharvest/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".siteharvest")
            .join("config.json")
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
    }

    /// Load the default config file if present, otherwise plain defaults.
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
