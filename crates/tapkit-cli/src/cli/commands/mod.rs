//! CLI command handlers. Each command is in its own file for clarity.

mod checksum;
mod completions;
mod fetch;
mod info;
mod install;
mod list;
mod uninstall;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use fetch::run_fetch;
pub use info::run_info;
pub use install::run_install;
pub use list::run_list;
pub use test::run_test;
pub use uninstall::run_uninstall;
