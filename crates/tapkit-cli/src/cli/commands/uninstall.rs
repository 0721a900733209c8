//! `tapkit uninstall <NAME>` – remove an installed binary and its receipt.

use anyhow::Result;
use tapkit_core::config::TapConfig;
use tapkit_core::installer;

pub fn run_uninstall(cfg: &TapConfig, name: &str) -> Result<()> {
    if installer::uninstall(cfg, name)? {
        println!("Uninstalled {name}");
    } else {
        println!("Nothing installed as {name}");
    }
    Ok(())
}
