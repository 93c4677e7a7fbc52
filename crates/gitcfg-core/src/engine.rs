//! Merge/split engine between the logical config and its stored blobs
//!
//! Reading merges the root config blob with the fanout directory into one
//! [`Config`]. Splitting takes a change set and produces the blob contents
//! that must be written to apply it, each built on top of the blob's
//! current content so unrelated settings survive.

use gitcfg_config::{Config, ConfigBuilder};
use gitcfg_store::{EntryKind, ObjectId, ObjectStore};

use crate::section::{REMOTE_SECTION, SectionKind};
use crate::settings::LayoutSettings;
use crate::warning::{MergedConfig, Warning, Warnings};
use crate::{Error, Result};

/// A blob that must be written at `path` to apply a change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobWrite {
    pub path: String,
    pub content: String,
}

/// Output of [`ConfigEngine::split`].
#[derive(Debug, Clone, Default)]
pub struct SplitPlan {
    pub writes: Vec<BlobWrite>,
    pub warnings: Vec<Warning>,
}

/// Reads and splits configuration against one tree of an [`ObjectStore`].
pub struct ConfigEngine<'a, S: ?Sized> {
    store: &'a S,
    layout: &'a LayoutSettings,
}

impl<'a, S: ObjectStore + ?Sized> ConfigEngine<'a, S> {
    pub fn new(store: &'a S, layout: &'a LayoutSettings) -> Self {
        Self { store, layout }
    }

    /// Materialize the logical configuration stored in `tree`.
    ///
    /// `None` stands for an empty tree. Only store failures are errors;
    /// malformed blobs and layout violations end up in the warnings.
    pub fn read(&self, tree: Option<ObjectId>) -> Result<MergedConfig> {
        let mut warnings = Warnings::default();
        let Some(tree) = tree else {
            return Ok(MergedConfig::default());
        };

        let base = self
            .load(tree, &self.layout.root_config, &mut warnings)?
            .unwrap_or_default();

        let Some(entries) = self.store.list_dir(tree, &self.layout.fanout_dir)? else {
            return Ok(MergedConfig::new(base, warnings.into_vec()));
        };

        let mut merged = drop_root_remotes(base, &mut warnings);

        let mut fanout: Vec<(&str, String)> = entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::File)
            .filter_map(|entry| {
                self.layout
                    .remote_name(&entry.name)
                    .map(|remote| (remote, format!("{}/{}", self.layout.fanout_dir, entry.name)))
            })
            .collect();
        fanout.sort_unstable_by(|a, b| a.1.cmp(&b.1));

        for (remote, path) in fanout {
            let Some(fragment) = self.load(tree, &path, &mut warnings)? else {
                continue;
            };
            for key in fragment.names(REMOTE_SECTION, None) {
                merged.set_string_list(
                    REMOTE_SECTION,
                    Some(remote),
                    key,
                    fragment.get_string_list(REMOTE_SECTION, None, key).iter().cloned(),
                );
            }
        }

        Ok(MergedConfig::new(merged.build(), warnings.into_vec()))
    }

    /// Compute the blob writes that apply `delta` on top of `tree`.
    ///
    /// Each subsection named in `delta` has its key set replaced wholesale;
    /// top-level keys replace the same key only. The root blob is always
    /// part of the plan, and one fanout file is emitted per `remote`
    /// subsection in `delta`. A `delta` with names the text encoding cannot
    /// read back is rejected with [`Error::InvalidChange`].
    pub fn split(&self, tree: Option<ObjectId>, delta: &Config) -> Result<SplitPlan> {
        delta.validate().map_err(Error::InvalidChange)?;
        let mut warnings = Warnings::default();
        let mut root = match tree {
            Some(tree) => self
                .load(tree, &self.layout.root_config, &mut warnings)?
                .unwrap_or_default(),
            None => Config::new(),
        }
        .into_builder();
        let mut writes = Vec::new();

        for section in delta.sections() {
            for key in delta.names(section, None) {
                root.set_string_list(
                    section,
                    None,
                    key,
                    delta.get_string_list(section, None, key).iter().cloned(),
                );
            }

            match SectionKind::classify(section) {
                SectionKind::Remote => {
                    for remote in delta.subsections(section) {
                        validate_remote_name(remote)?;
                        let path = self.layout.fanout_path(remote);
                        let current = match tree {
                            Some(tree) => self.load(tree, &path, &mut warnings)?.unwrap_or_default(),
                            None => Config::new(),
                        };
                        let mut fragment = current.into_builder();
                        replace_keys(&mut fragment, REMOTE_SECTION, None, delta, section, Some(remote));
                        writes.push(BlobWrite {
                            path,
                            content: fragment.build().to_text(),
                        });
                    }
                }
                SectionKind::Other(name) => {
                    for subsection in delta.subsections(name) {
                        replace_keys(&mut root, name, Some(subsection), delta, name, Some(subsection));
                    }
                }
            }
        }

        writes.insert(
            0,
            BlobWrite {
                path: self.layout.root_config.clone(),
                content: root.build().to_text(),
            },
        );

        Ok(SplitPlan {
            writes,
            warnings: warnings.into_vec(),
        })
    }

    /// Read and parse the blob at `path`. Absent and malformed blobs both
    /// yield `None`; the latter also records a warning.
    fn load(&self, tree: ObjectId, path: &str, warnings: &mut Warnings) -> Result<Option<Config>> {
        let Some(bytes) = self.store.read_blob(tree, path)? else {
            return Ok(None);
        };
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warnings.push(Warning::Malformed {
                    path: path.to_string(),
                    message: e.to_string(),
                });
                return Ok(None);
            }
        };
        match Config::parse(&text) {
            Ok(config) => Ok(Some(config)),
            Err(e) => {
                warnings.push(Warning::Malformed {
                    path: path.to_string(),
                    message: e.to_string(),
                });
                Ok(None)
            }
        }
    }
}

/// Remove every `remote` subsection from the root config; the fanout
/// directory is authoritative for remotes whenever it exists.
fn drop_root_remotes(base: Config, warnings: &mut Warnings) -> ConfigBuilder {
    let names: Vec<String> = base
        .subsections(REMOTE_SECTION)
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut builder = base.into_builder();
    if !names.is_empty() {
        for name in &names {
            builder.unset_section(REMOTE_SECTION, Some(name));
        }
        warnings.push(Warning::RemotesInRootIgnored { names });
    }
    builder
}

/// Replace the key set of `dest_section`/`dest_sub` with the keys of
/// `src_section`/`src_sub` from `source`.
fn replace_keys(
    dest: &mut ConfigBuilder,
    dest_section: &str,
    dest_sub: Option<&str>,
    source: &Config,
    src_section: &str,
    src_sub: Option<&str>,
) {
    dest.clear_section(dest_section, dest_sub);
    for key in source.names(src_section, src_sub) {
        dest.set_string_list(
            dest_section,
            dest_sub,
            key,
            source.get_string_list(src_section, src_sub, key).iter().cloned(),
        );
    }
}

/// A remote name must be usable verbatim as a single file name.
fn validate_remote_name(name: &str) -> Result<()> {
    let message = if name.is_empty() {
        "name is empty"
    } else if name == "." || name == ".." {
        "name is a relative path component"
    } else if name.contains(['/', '\\', '\0', '\n']) {
        "name contains a path separator or control character"
    } else {
        return Ok(());
    };
    Err(Error::InvalidRemoteName {
        name: name.to_string(),
        message: message.to_string(),
    })
}
