//! CLI for the tapkit formula installer.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;
use tapkit_core::config;

use commands::{
    run_checksum, run_completions, run_fetch, run_info, run_install, run_list, run_test,
    run_uninstall,
};

/// Top-level CLI for the tapkit formula installer.
#[derive(Debug, Parser)]
#[command(name = "tapkit")]
#[command(about = "tapkit: fetch, verify, and install prebuilt binary releases", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch, verify, and install a formula's binary.
    Install {
        /// Bundled formula name, or path to a formula TOML file.
        #[arg(default_value = "kmscrypter")]
        formula: String,
        /// Refetch the artifact even if a verified copy is cached.
        #[arg(long)]
        force: bool,
    },

    /// Download and verify a formula's artifact without installing.
    Fetch {
        /// Bundled formula name, or path to a formula TOML file.
        #[arg(default_value = "kmscrypter")]
        formula: String,
        /// Refetch the artifact even if a verified copy is cached.
        #[arg(long)]
        force: bool,
    },

    /// Smoke-test an installed binary (`<name> -v` must exit 0).
    Test {
        /// Installed formula name.
        #[arg(default_value = "kmscrypter")]
        name: String,
    },

    /// Remove an installed binary and its receipt.
    Uninstall {
        /// Installed formula name.
        name: String,
    },

    /// List installed formulas.
    List,

    /// Show a formula's metadata.
    Info {
        /// Bundled formula name, or path to a formula TOML file.
        #[arg(default_value = "kmscrypter")]
        formula: String,
    },

    /// Compute SHA-256 of a file (e.g. a downloaded artifact).
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Generate shell completions on stdout.
    Completions {
        /// Shell to generate for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Install { formula, force } => run_install(&cfg, &formula, force)?,
            CliCommand::Fetch { formula, force } => run_fetch(&cfg, &formula, force)?,
            CliCommand::Test { name } => run_test(&cfg, &name)?,
            CliCommand::Uninstall { name } => run_uninstall(&cfg, &name)?,
            CliCommand::List => run_list(&cfg)?,
            CliCommand::Info { formula } => run_info(&formula)?,
            CliCommand::Checksum { path } => run_checksum(Path::new(&path))?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}
