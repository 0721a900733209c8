//! The install pipeline: fetch, verify, unpack, install, record.
//!
//! The artifact digest is checked before anything is unpacked or copied; a
//! mismatch aborts the whole operation and leaves the bin directory
//! untouched. None of the steps retry.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::checksum;
use crate::config::TapConfig;
use crate::fetch;
use crate::formula::Formula;
use crate::install;
use crate::receipts::{Receipt, Receipts};
use crate::smoke;
use crate::stage;

/// Result of a completed install.
#[derive(Debug)]
pub struct InstallOutcome {
    /// Where the binary was installed.
    pub bin_path: PathBuf,
    /// True if a previously installed binary was replaced.
    pub replaced: bool,
    /// True if the artifact came from the local cache without a fetch.
    pub cached: bool,
}

/// Fetch (or reuse from cache) and verify the formula's artifact.
/// Returns the verified tarball path and whether the cache satisfied it.
pub fn fetch_formula(
    cfg: &TapConfig,
    formula: &Formula,
    force: bool,
) -> Result<(PathBuf, bool)> {
    formula.validate()?;
    let artifact = artifact_cache_path(cfg, formula)?;

    if !force && artifact.is_file() {
        match checksum::verify_sha256(&artifact, &formula.sha256) {
            Ok(_) => {
                tracing::debug!(artifact = %artifact.display(), "using cached artifact");
                return Ok((artifact, true));
            }
            Err(e) => {
                tracing::warn!("cached artifact failed verification, refetching: {}", e);
            }
        }
    }

    tracing::info!(url = %formula.url, "fetching {} {}", formula.name, formula.version);
    fetch::download(&formula.url, &artifact, cfg.fetch_options())?;
    if let Err(e) = checksum::verify_sha256(&artifact, &formula.sha256) {
        // Don't leave an artifact around that a later run could mistake for verified.
        let _ = std::fs::remove_file(&artifact);
        return Err(e).with_context(|| {
            format!("artifact for {} {}", formula.name, formula.version)
        });
    }
    Ok((artifact, false))
}

/// Run the full pipeline for `formula`: fetch, verify, unpack, install the
/// executable into the bin directory, and record a receipt.
pub fn install_formula(
    cfg: &TapConfig,
    formula: &Formula,
    force: bool,
) -> Result<InstallOutcome> {
    let (artifact, cached) = fetch_formula(cfg, formula, force)?;

    let cache_dir = cfg.cache_dir()?;
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("create dir: {}", cache_dir.display()))?;
    let staging = tempfile::tempdir_in(&cache_dir).context("create staging dir")?;
    stage::unpack_tar_gz(&artifact, staging.path())?;
    let source = stage::staged_binary(staging.path(), &formula.name)?;

    let bin_dir = cfg.bin_dir()?;
    let installed = install::install_binary(&source, &bin_dir, &formula.name)
        .with_context(|| format!("install {}", formula.name))?;

    let receipts_path = cfg.receipts_path()?;
    let mut receipts = Receipts::load(&receipts_path)?;
    receipts.upsert(Receipt {
        name: formula.name.clone(),
        version: formula.version.clone(),
        url: formula.url.clone(),
        sha256: formula.sha256.clone(),
        bin_path: installed.path.clone(),
    });
    receipts.save(&receipts_path)?;

    Ok(InstallOutcome {
        bin_path: installed.path,
        replaced: installed.replaced,
        cached,
    })
}

/// Smoke-test an installed formula: run its binary with `-v`, exit 0 passes.
/// Returns the path that was tested.
pub fn smoke_test(cfg: &TapConfig, name: &str) -> Result<PathBuf> {
    let receipts = Receipts::load(&cfg.receipts_path()?)?;
    let bin_path = match receipts.get(name) {
        Some(r) => r.bin_path.clone(),
        None => cfg.bin_dir()?.join(name),
    };
    smoke::run(&bin_path)?;
    Ok(bin_path)
}

/// Remove an installed binary and its receipt. Missing pieces are skipped;
/// returns true if anything was removed.
pub fn uninstall(cfg: &TapConfig, name: &str) -> Result<bool> {
    let receipts_path = cfg.receipts_path()?;
    let mut receipts = Receipts::load(&receipts_path)?;
    let bin_path = match receipts.get(name) {
        Some(r) => r.bin_path.clone(),
        None => cfg.bin_dir()?.join(name),
    };

    let mut removed = false;
    match std::fs::remove_file(&bin_path) {
        Ok(()) => {
            tracing::info!(path = %bin_path.display(), "removed binary");
            removed = true;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("remove {}", bin_path.display()))
        }
    }
    if receipts.remove(name).is_some() {
        receipts.save(&receipts_path)?;
        removed = true;
    }
    Ok(removed)
}

/// Cache location of the formula's tarball:
/// `<cache dir>/<name>-<version>/<tarball filename>`.
fn artifact_cache_path(cfg: &TapConfig, formula: &Formula) -> Result<PathBuf> {
    let filename = formula.artifact_filename()?;
    Ok(cfg
        .cache_dir()?
        .join(format!("{}-{}", formula.name, formula.version))
        .join(filename))
}
