use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::FetchOptions;
use crate::receipts::Receipts;

/// Global configuration loaded from `~/.config/tapkit/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Directory binaries are installed into. Default: `<XDG data home>/tapkit/bin`.
    #[serde(default)]
    pub bin_dir: Option<PathBuf>,
    /// Directory fetched artifacts are cached in. Default: `<XDG cache home>/tapkit`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Directory receipts are kept in. Default: `<XDG state home>/tapkit`.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    /// Connect timeout for artifact fetches, in seconds.
    pub connect_timeout_secs: u64,
    /// Total transfer timeout for artifact fetches, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            bin_dir: None,
            cache_dir: None,
            state_dir: None,
            connect_timeout_secs: 15,
            fetch_timeout_secs: 600,
        }
    }
}

impl TapConfig {
    /// Effective bin directory (config override or XDG default).
    pub fn bin_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.bin_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("tapkit")?;
        Ok(xdg_dirs.get_data_home().join("bin"))
    }

    /// Effective artifact cache directory.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("tapkit")?;
        Ok(xdg_dirs.get_cache_home())
    }

    /// Effective receipts file path.
    pub fn receipts_path(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.state_dir {
            return Ok(dir.join("receipts.json"));
        }
        Receipts::default_path()
    }

    /// Fetch timeouts as `FetchOptions`.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tapkit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TapConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TapConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TapConfig = toml::from_str(&data)?;
    Ok(cfg)
}
