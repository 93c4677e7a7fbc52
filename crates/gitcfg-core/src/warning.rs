//! Non-fatal problems found while reading the configuration

use std::fmt;

use gitcfg_config::Config;

/// A condition that was tolerated rather than failing the read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A config blob did not parse and was treated as empty.
    Malformed { path: String, message: String },

    /// The root blob declared remotes while the fanout directory exists.
    /// Those remotes were dropped in favour of the fanout files.
    RemotesInRootIgnored { names: Vec<String> },

    /// The store could not be read at all.
    StoreUnavailable { message: String },
}

impl Warning {
    /// Emit this warning through `tracing`.
    pub(crate) fn log(&self) {
        match self {
            Self::Malformed { path, message } => {
                tracing::warn!(path = %path, error = %message, "Cannot parse configuration blob");
            }
            Self::RemotesInRootIgnored { names } => {
                tracing::error!(
                    remotes = %names.join(","),
                    "Root config cannot contain remotes while the fanout directory is present; ignoring them"
                );
            }
            Self::StoreUnavailable { message } => {
                tracing::warn!(error = %message, "Cannot read configuration from the object store");
            }
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { path, message } => write!(f, "{path}: {message}"),
            Self::RemotesInRootIgnored { names } => {
                write!(f, "ignored remotes in root config: {}", names.join(", "))
            }
            Self::StoreUnavailable { message } => write!(f, "store unavailable: {message}"),
        }
    }
}

/// Logical configuration together with what was tolerated to produce it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedConfig {
    pub config: Config,
    pub warnings: Vec<Warning>,
}

impl MergedConfig {
    pub fn new(config: Config, warnings: Vec<Warning>) -> Self {
        Self { config, warnings }
    }

    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Collects warnings, logging each as it arrives.
#[derive(Debug, Default)]
pub(crate) struct Warnings(Vec<Warning>);

impl Warnings {
    pub(crate) fn push(&mut self, warning: Warning) {
        warning.log();
        self.0.push(warning);
    }

    pub(crate) fn into_vec(self) -> Vec<Warning> {
        self.0
    }
}
