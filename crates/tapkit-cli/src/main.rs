use tapkit_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Initialize logging as early as possible; if the state dir is not
    // writable, log to stderr instead of crashing.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("tapkit error: {:#}", err);
        std::process::exit(1);
    }
}
