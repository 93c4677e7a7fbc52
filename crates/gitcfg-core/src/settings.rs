//! Settings for where and how the configuration is stored
//!
//! Every field has a default, so an empty (or missing) settings file yields
//! the standard layout:
//!
//! ```toml
//! [layout]
//! ref-name = "refs/meta/replication"
//! root-config = "replication.config"
//! fanout-dir = "replication"
//! fanout-extension = ".config"
//!
//! [identity]
//! name = "gitcfg"
//! email = "gitcfg@localhost"
//! message = "Update configuration"
//! ```

use std::path::{Path, PathBuf};

use gitcfg_store::Identity;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

fn default_ref_name() -> String {
    "refs/meta/replication".to_string()
}

fn default_root_config() -> String {
    "replication.config".to_string()
}

fn default_fanout_dir() -> String {
    "replication".to_string()
}

fn default_fanout_extension() -> String {
    ".config".to_string()
}

fn default_identity_name() -> String {
    "gitcfg".to_string()
}

fn default_identity_email() -> String {
    "gitcfg@localhost".to_string()
}

fn default_message() -> String {
    "Update configuration".to_string()
}

/// Physical layout of the configuration inside the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayoutSettings {
    /// Reference holding the configuration history
    #[serde(default = "default_ref_name")]
    pub ref_name: String,
    /// Root config blob path
    #[serde(default = "default_root_config")]
    pub root_config: String,
    /// Directory with one file per remote
    #[serde(default = "default_fanout_dir")]
    pub fanout_dir: String,
    /// Suffix of fanout files, dot included
    #[serde(default = "default_fanout_extension")]
    pub fanout_extension: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            ref_name: default_ref_name(),
            root_config: default_root_config(),
            fanout_dir: default_fanout_dir(),
            fanout_extension: default_fanout_extension(),
        }
    }
}

impl LayoutSettings {
    /// Tree path of the fanout file for `remote`.
    pub fn fanout_path(&self, remote: &str) -> String {
        format!("{}/{}{}", self.fanout_dir, remote, self.fanout_extension)
    }

    /// Remote name a fanout file stands for, if the file name matches.
    pub fn remote_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.fanout_extension.as_str())
            .filter(|stem| !stem.is_empty())
    }
}

/// Identity and message stamped on configuration commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySettings {
    #[serde(default = "default_identity_name")]
    pub name: String,
    #[serde(default = "default_identity_email")]
    pub email: String,
    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            name: default_identity_name(),
            email: default_identity_email(),
            message: default_message(),
        }
    }
}

impl IdentitySettings {
    pub fn identity(&self) -> Identity {
        Identity::new(&self.name, &self.email)
    }
}

/// Complete settings document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub identity: IdentitySettings,
}

impl Settings {
    /// Parse and validate settings from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load from `explicit` if given, else from [`Settings::default_path`]
    /// when that file exists, else fall back to defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Loading settings");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Platform config directory location, e.g. `~/.config/gitcfg/settings.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gitcfg").join("settings.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        if !layout.ref_name.starts_with("refs/") {
            return Err(invalid(format!(
                "ref-name '{}' must start with 'refs/'",
                layout.ref_name
            )));
        }
        check_tree_path("root-config", &layout.root_config)?;
        check_tree_path("fanout-dir", &layout.fanout_dir)?;
        if layout.root_config == layout.fanout_dir {
            return Err(invalid("root-config and fanout-dir must differ"));
        }
        if is_inside(&layout.root_config, &layout.fanout_dir)
            || is_inside(&layout.fanout_dir, &layout.root_config)
        {
            return Err(invalid(format!(
                "root-config '{}' and fanout-dir '{}' must not contain each other",
                layout.root_config, layout.fanout_dir
            )));
        }
        if layout.fanout_extension.len() < 2
            || !layout.fanout_extension.starts_with('.')
            || layout.fanout_extension.contains('/')
        {
            return Err(invalid(format!(
                "fanout-extension '{}' must look like '.config'",
                layout.fanout_extension
            )));
        }
        if self.identity.name.trim().is_empty() || self.identity.email.trim().is_empty() {
            return Err(invalid("identity name and email must not be empty"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidSettings {
        message: message.into(),
    }
}

/// Whether tree path `path` lies below directory `dir`.
fn is_inside(path: &str, dir: &str) -> bool {
    path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
}

fn check_tree_path(field: &str, path: &str) -> Result<()> {
    let valid = !path.is_empty()
        && path
            .split('/')
            .all(|part| !part.is_empty() && part != "." && part != "..");
    if valid {
        Ok(())
    } else {
        Err(invalid(format!("{field} '{path}' is not a relative tree path")))
    }
}
