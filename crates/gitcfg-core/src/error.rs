//! Error types for gitcfg-core

use std::path::PathBuf;

use gitcfg_store::RejectReason;

/// Result type for gitcfg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitcfg-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Another writer moved the reference between our read and our publish
    #[error("Updating configuration reference {ref_name} failed: {reason}")]
    ConcurrentUpdate {
        ref_name: String,
        reason: RejectReason,
    },

    /// Change set holds a name that cannot be stored as config text
    #[error("Invalid configuration change: {0}")]
    InvalidChange(#[source] gitcfg_config::Error),

    /// Remote name cannot be mapped 1:1 to a fanout file
    #[error("Invalid remote name '{name}': {message}")]
    InvalidRemoteName { name: String, message: String },

    /// Settings failed validation
    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },

    /// Settings file could not be read
    #[error("Cannot read settings at {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Object store error from gitcfg-store
    #[error(transparent)]
    Store(#[from] gitcfg_store::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
