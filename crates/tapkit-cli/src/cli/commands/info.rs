//! `tapkit info [FORMULA]` – show a formula's declared metadata.

use anyhow::Result;
use tapkit_core::formula;

pub fn run_info(name_or_path: &str) -> Result<()> {
    let f = formula::resolve(name_or_path)?;
    println!("{}: {}", f.name, f.desc);
    println!("homepage: {}", f.homepage);
    println!("version:  {}", f.version);
    println!("url:      {}", f.url);
    println!("sha256:   {}", f.sha256);
    Ok(())
}
