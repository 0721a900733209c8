//! Receipts: record of what tapkit installed, persisted as JSON under the
//! XDG state dir so `list`, `test`, and `uninstall` know what is on disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One installed formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub name: String,
    pub version: String,
    pub url: String,
    pub sha256: String,
    pub bin_path: PathBuf,
}

/// All receipts, keyed by formula name.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Receipts {
    #[serde(default)]
    entries: BTreeMap<String, Receipt>,
}

impl Receipts {
    /// Default receipts file: `~/.local/state/tapkit/receipts.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("tapkit")?;
        Ok(xdg_dirs.get_state_home().join("receipts.json"))
    }

    /// Load receipts from `path`. A missing file is an empty set.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("read receipts: {}", path.display()))
            }
        };
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse receipts: {}", path.display()))
    }

    /// Save receipts to `path` (creates the parent dir if needed).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize receipts")?;
        std::fs::write(path, json)
            .with_context(|| format!("write receipts: {}", path.display()))?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Receipt> {
        self.entries.get(name)
    }

    /// Insert or replace the receipt for its formula name.
    pub fn upsert(&mut self, receipt: Receipt) {
        self.entries.insert(receipt.name.clone(), receipt);
    }

    pub fn remove(&mut self, name: &str) -> Option<Receipt> {
        self.entries.remove(name)
    }

    /// Receipts in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Receipt> {
        self.entries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
