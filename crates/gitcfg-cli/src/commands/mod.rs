//! Command implementations for gitcfg-cli

pub mod history;
pub mod show;
pub mod update;

pub use history::{run_log, run_version};
pub use show::run_get;
pub use update::{run_apply, run_set};
