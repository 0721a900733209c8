pub mod config;
pub mod logging;

// Install pipeline, in the order the steps run.
pub mod formula;
pub mod fetch;
pub mod checksum;
pub mod stage;
pub mod install;
pub mod smoke;
pub mod receipts;
pub mod installer;
