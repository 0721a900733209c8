//! `tapkit list` – show installed formulas.

use anyhow::Result;
use tapkit_core::config::TapConfig;
use tapkit_core::receipts::Receipts;

pub fn run_list(cfg: &TapConfig) -> Result<()> {
    let receipts = Receipts::load(&cfg.receipts_path()?)?;
    if receipts.is_empty() {
        println!("No formulas installed.");
    } else {
        println!("{:<16} {:<10} {}", "NAME", "VERSION", "PATH");
        for r in receipts.iter() {
            println!(
                "{:<16} {:<10} {}",
                r.name,
                r.version,
                r.bin_path.display()
            );
        }
    }
    Ok(())
}
