//! Shared test utilities for the gitcfg workspace.
//!
//! This crate provides standardised fixtures to avoid duplication across
//! crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`git`]: repository fixtures
//! - [`repo`]: [`TestRepo`](repo::TestRepo) for seeding and inspecting the configuration ref

pub mod git;
pub mod repo;

/// Parse configuration text, panicking on malformed input.
///
/// # Panics
/// Panics if `text` is not valid configuration text.
pub fn config(text: &str) -> gitcfg_config::Config {
    gitcfg_config::Config::parse(text)
        .unwrap_or_else(|e| panic!("config: invalid test fixture: {e}\n{text}"))
}
