//! `tapkit fetch [FORMULA]` – download and verify without installing.

use anyhow::Result;
use tapkit_core::config::TapConfig;
use tapkit_core::formula;
use tapkit_core::installer;

pub fn run_fetch(cfg: &TapConfig, name_or_path: &str, force: bool) -> Result<()> {
    let f = formula::resolve(name_or_path)?;
    let (path, cached) = installer::fetch_formula(cfg, &f, force)?;
    if cached {
        println!("Verified cached artifact: {}", path.display());
    } else {
        println!("Fetched and verified: {}", path.display());
    }
    Ok(())
}
