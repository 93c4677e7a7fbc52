//! Error types for gitcfg-store

use std::path::PathBuf;

/// Result type for gitcfg-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitcfg-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not found at {path}: {source}")]
    RepositoryNotFound {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Invalid tree path '{path}': {message}")]
    InvalidPath { path: String, message: String },
}
