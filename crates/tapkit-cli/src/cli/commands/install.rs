//! `tapkit install [FORMULA]` – run the full install pipeline.

use anyhow::Result;
use tapkit_core::config::TapConfig;
use tapkit_core::formula;
use tapkit_core::installer;

pub fn run_install(cfg: &TapConfig, name_or_path: &str, force: bool) -> Result<()> {
    let f = formula::resolve(name_or_path)?;
    let outcome = installer::install_formula(cfg, &f, force)?;
    let how = if outcome.cached { "from cache" } else { "fetched" };
    println!(
        "Installed {} {} to {} ({how})",
        f.name,
        f.version,
        outcome.bin_path.display()
    );
    Ok(())
}
