//! Dotted `section[.subsection].key` addressing

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Fully qualified key, e.g. `remote.origin.url` or `gerrit.autoReload`.
///
/// The section is everything before the first dot and the key everything
/// after the last one; the subsection in between may itself contain dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigKey {
    pub section: String,
    pub subsection: Option<String>,
    pub name: String,
}

impl ConfigKey {
    pub fn subsection(&self) -> Option<&str> {
        self.subsection.as_deref()
    }
}

/// Why `name` cannot be written as a section name, if it cannot.
pub(crate) fn section_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        Some("section names may only contain letters, digits and '-'")
    } else {
        None
    }
}

/// Why `sub` cannot be written as a quoted subsection name, if it cannot.
pub(crate) fn subsection_problem(sub: &str) -> Option<&'static str> {
    if sub.is_empty() || sub.contains('\n') {
        Some("empty or multi-line subsection")
    } else {
        None
    }
}

/// Why `name` cannot be written as a key name, if it cannot.
pub(crate) fn name_problem(name: &str) -> Option<&'static str> {
    if !name.starts_with(|c: char| c.is_ascii_alphabetic())
        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        Some("key names must start with a letter and contain only letters, digits and '-'")
    } else {
        None
    }
}

pub(crate) fn invalid(key: &str, message: &str) -> Error {
    Error::InvalidKey {
        key: key.to_string(),
        message: message.to_string(),
    }
}

impl FromStr for ConfigKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (section, rest) = s
            .split_once('.')
            .ok_or_else(|| invalid(s, "expected section.key"))?;
        let (subsection, name) = match rest.rsplit_once('.') {
            Some((sub, name)) => (Some(sub), name),
            None => (None, rest),
        };

        if let Some(message) = subsection.and_then(subsection_problem) {
            return Err(invalid(s, message));
        }
        if let Some(message) = section_problem(section).or_else(|| name_problem(name)) {
            return Err(invalid(s, message));
        }

        Ok(Self {
            section: section.to_ascii_lowercase(),
            subsection: subsection.map(str::to_string),
            name: name.to_ascii_lowercase(),
        })
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subsection {
            Some(sub) => write!(f, "{}.{}.{}", self.section, sub, self.name),
            None => write!(f, "{}.{}", self.section, self.name),
        }
    }
}
