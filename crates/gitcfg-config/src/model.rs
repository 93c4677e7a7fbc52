//! Immutable configuration value and its builder

use std::fmt;

use crate::Result;
use crate::key::{invalid, name_problem, section_problem, subsection_problem};

/// One `[section]` or `[section "subsection"]` block.
#[derive(Debug, Clone)]
pub(crate) struct Section {
    pub(crate) name: String,
    pub(crate) subsection: Option<String>,
    pub(crate) entries: Vec<Entry>,
}

/// A key with its ordered values.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) key: String,
    pub(crate) values: Vec<String>,
}

impl Section {
    fn matches(&self, name: &str, subsection: Option<&str>) -> bool {
        self.name.eq_ignore_ascii_case(name) && self.subsection.as_deref() == subsection
    }

    fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key.eq_ignore_ascii_case(key))
    }
}

/// Ordered, multi-valued configuration.
///
/// Section and key names are case-insensitive and kept in lowercase.
/// Subsection names are case-sensitive. Two configs are equal when their
/// serialized text is identical.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub(crate) sections: Vec<Section>,
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder seeded with this configuration.
    pub fn into_builder(self) -> ConfigBuilder {
        ConfigBuilder {
            sections: self.sections,
        }
    }

    /// Start a builder seeded with a copy of this configuration.
    pub fn to_builder(&self) -> ConfigBuilder {
        self.clone().into_builder()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Distinct section names in order of first appearance.
    pub fn sections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for section in &self.sections {
            if !names.contains(&section.name.as_str()) {
                names.push(&section.name);
            }
        }
        names
    }

    /// Subsection names declared under `section`, in order.
    pub fn subsections(&self, section: &str) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.name.eq_ignore_ascii_case(section))
            .filter_map(|s| s.subsection.as_deref())
            .collect()
    }

    /// Whether the given `section`/`subsection` block exists.
    pub fn has_section(&self, section: &str, subsection: Option<&str>) -> bool {
        self.find(section, subsection).is_some()
    }

    /// Key names of a block, in order.
    pub fn names(&self, section: &str, subsection: Option<&str>) -> Vec<&str> {
        self.find(section, subsection)
            .map(|s| s.entries.iter().map(|e| e.key.as_str()).collect())
            .unwrap_or_default()
    }

    /// Last value of a key, as git resolves single-valued lookups.
    pub fn get_string(&self, section: &str, subsection: Option<&str>, key: &str) -> Option<&str> {
        self.get_string_list(section, subsection, key)
            .last()
            .map(String::as_str)
    }

    /// All values of a key in order; empty when the key is absent.
    pub fn get_string_list(&self, section: &str, subsection: Option<&str>, key: &str) -> &[String] {
        self.find(section, subsection)
            .and_then(|s| s.entry(key))
            .map(|e| e.values.as_slice())
            .unwrap_or(&[])
    }

    /// Check that every name can be written as text and read back.
    ///
    /// [`ConfigBuilder`] accepts any string; a config assembled from names
    /// the parser would reject fails here with [`Error::InvalidKey`](crate::Error::InvalidKey).
    pub fn validate(&self) -> Result<()> {
        for section in &self.sections {
            let block = match &section.subsection {
                Some(sub) => format!("{}.{}", section.name, sub),
                None => section.name.clone(),
            };
            let problem = section_problem(&section.name)
                .or_else(|| section.subsection.as_deref().and_then(subsection_problem));
            if let Some(message) = problem {
                return Err(invalid(&block, message));
            }
            for entry in &section.entries {
                if let Some(message) = name_problem(&entry.key) {
                    return Err(invalid(&format!("{block}.{}", entry.key), message));
                }
            }
        }
        Ok(())
    }

    fn find(&self, section: &str, subsection: Option<&str>) -> Option<&Section> {
        self.sections.iter().find(|s| s.matches(section, subsection))
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.to_text() == other.to_text()
    }
}

impl Eq for Config {}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Accumulator for producing a new [`Config`].
///
/// Setters follow git semantics: setting a key replaces its whole value list,
/// and new blocks and keys are appended after existing ones. Names are not
/// checked here; see [`Config::validate`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    sections: Vec<Section>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key to a single value.
    pub fn set_string(
        &mut self,
        section: &str,
        subsection: Option<&str>,
        key: &str,
        value: impl Into<String>,
    ) -> &mut Self {
        self.set_string_list(section, subsection, key, [value.into()])
    }

    /// Replace the value list of a key. An empty list removes the key but
    /// keeps its block.
    pub fn set_string_list<I, V>(
        &mut self,
        section: &str,
        subsection: Option<&str>,
        key: &str,
        values: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return self.unset(section, subsection, key);
        }

        let block = self.block_mut(section, subsection);
        match block
            .entries
            .iter_mut()
            .find(|e| e.key.eq_ignore_ascii_case(key))
        {
            Some(entry) => entry.values = values,
            None => block.entries.push(Entry {
                key: key.to_ascii_lowercase(),
                values,
            }),
        }
        self
    }

    /// Remove a key from a block.
    pub fn unset(&mut self, section: &str, subsection: Option<&str>, key: &str) -> &mut Self {
        if let Some(block) = self
            .sections
            .iter_mut()
            .find(|s| s.matches(section, subsection))
        {
            block.entries.retain(|e| !e.key.eq_ignore_ascii_case(key));
        }
        self
    }

    /// Remove a whole block, keys included.
    pub fn unset_section(&mut self, section: &str, subsection: Option<&str>) -> &mut Self {
        self.sections.retain(|s| !s.matches(section, subsection));
        self
    }

    /// Drop every key of a block while keeping its position; the block is
    /// appended if it does not exist yet.
    pub fn clear_section(&mut self, section: &str, subsection: Option<&str>) -> &mut Self {
        self.block_mut(section, subsection).entries.clear();
        self
    }

    /// Declare a block without keys. Does nothing if it already exists.
    pub fn add_section(&mut self, section: &str, subsection: Option<&str>) -> &mut Self {
        self.block_mut(section, subsection);
        self
    }

    /// Append one value to a key, keeping the existing ones.
    pub(crate) fn push_value(
        &mut self,
        section: &str,
        subsection: Option<&str>,
        key: &str,
        value: String,
    ) {
        let block = self.block_mut(section, subsection);
        match block
            .entries
            .iter_mut()
            .find(|e| e.key.eq_ignore_ascii_case(key))
        {
            Some(entry) => entry.values.push(value),
            None => block.entries.push(Entry {
                key: key.to_ascii_lowercase(),
                values: vec![value],
            }),
        }
    }

    pub fn build(self) -> Config {
        Config {
            sections: self.sections,
        }
    }

    fn block_mut(&mut self, section: &str, subsection: Option<&str>) -> &mut Section {
        let index = match self
            .sections
            .iter()
            .position(|s| s.matches(section, subsection))
        {
            Some(index) => index,
            None => {
                self.sections.push(Section {
                    name: section.to_ascii_lowercase(),
                    subsection: subsection.map(str::to_string),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }
}

impl From<Config> for ConfigBuilder {
    fn from(config: Config) -> Self {
        config.into_builder()
    }
}
