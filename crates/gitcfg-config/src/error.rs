//! Error types for gitcfg-config

/// Result type for gitcfg-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding configuration text or keys
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid config at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid config key '{key}': {message}")]
    InvalidKey { key: String, message: String },
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
