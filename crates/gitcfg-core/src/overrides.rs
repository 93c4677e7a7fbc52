//! Public entry point: read, update and version the stored configuration

use std::path::PathBuf;

use gitcfg_config::Config;
use gitcfg_store::{
    CommitInfo, GitStoreProvider, ObjectId, ObjectStore, RefUpdate, StoreProvider, TreeEdit,
};

use crate::engine::ConfigEngine;
use crate::settings::Settings;
use crate::warning::{MergedConfig, Warning};
use crate::{Error, Result};

/// Reflog message recorded when the reference moves.
const REFLOG_MESSAGE: &str = "gitcfg: update configuration";

/// What an [`GitConfigOverrides::update`] call did to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A new commit was published.
    Committed {
        commit: ObjectId,
        previous: Option<ObjectId>,
    },
    /// The resulting tree equals the current one; nothing was written.
    Unchanged,
}

/// Configuration stored at a reference of an object store.
///
/// Every call opens its own store view through the provider and keeps no
/// state between calls, so one instance may serve concurrent readers and
/// writers. Writers are serialized only by compare-and-swap on the
/// reference.
pub struct GitConfigOverrides<P> {
    provider: P,
    settings: Settings,
}

impl GitConfigOverrides<GitStoreProvider> {
    /// Store configuration in the git repository at `repository`.
    pub fn open(repository: impl Into<PathBuf>, settings: Settings) -> Self {
        Self::new(GitStoreProvider::new(repository), settings)
    }
}

impl<P: StoreProvider> GitConfigOverrides<P> {
    pub fn new(provider: P, settings: Settings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current logical configuration. Never fails: any problem is logged
    /// and an empty (or partial) configuration is returned.
    pub fn get_config(&self) -> Config {
        self.read_config().into_config()
    }

    /// Like [`get_config`](Self::get_config), also reporting what was tolerated.
    pub fn read_config(&self) -> MergedConfig {
        match self.try_read_config() {
            Ok(merged) => merged,
            Err(e) => {
                let warning = Warning::StoreUnavailable {
                    message: e.to_string(),
                };
                warning.log();
                MergedConfig::new(Config::new(), vec![warning])
            }
        }
    }

    fn try_read_config(&self) -> Result<MergedConfig> {
        let store = self.provider.open()?;
        let layout = &self.settings.layout;
        let head = store.resolve_ref(&layout.ref_name)?;
        let tree = head.map(|commit| store.read_tree(commit)).transpose()?;
        ConfigEngine::new(&store, layout).read(tree)
    }

    /// Apply `delta` and publish the result as one commit.
    ///
    /// Returns [`UpdateOutcome::Unchanged`] without writing a commit when the
    /// resulting tree is identical to the current one. Fails with
    /// [`Error::ConcurrentUpdate`] if the reference moved after it was read;
    /// the caller decides whether to re-read and retry. Fails with
    /// [`Error::InvalidChange`] before anything is written when `delta`
    /// holds a section, subsection or key name that cannot be stored.
    pub fn update(&self, delta: &Config) -> Result<UpdateOutcome> {
        let store = self.provider.open()?;
        let layout = &self.settings.layout;

        let old_commit = store.resolve_ref(&layout.ref_name)?;
        let old_tree = old_commit
            .map(|commit| store.read_tree(commit))
            .transpose()?;

        let plan = ConfigEngine::new(&store, layout).split(old_tree, delta)?;
        let mut edits = Vec::with_capacity(plan.writes.len());
        for write in &plan.writes {
            let blob = store.write_blob(write.content.as_bytes())?;
            edits.push(TreeEdit::upsert(write.path.clone(), blob));
        }
        let new_tree = store.build_tree(old_tree, &edits)?;

        if old_tree == Some(new_tree) {
            tracing::info!(
                reference = %layout.ref_name,
                "No configuration changes were applied, ignoring"
            );
            return Ok(UpdateOutcome::Unchanged);
        }

        let identity = self.settings.identity.identity();
        let new_commit = store.commit(
            old_commit,
            new_tree,
            &identity,
            &self.settings.identity.message,
        )?;

        match store.compare_and_swap_ref(&layout.ref_name, old_commit, new_commit, REFLOG_MESSAGE)? {
            RefUpdate::New | RefUpdate::FastForward => {
                tracing::info!(
                    reference = %layout.ref_name,
                    commit = %new_commit,
                    files = plan.writes.len(),
                    "Configuration updated"
                );
                Ok(UpdateOutcome::Committed {
                    commit: new_commit,
                    previous: old_commit,
                })
            }
            RefUpdate::Rejected(reason) => Err(Error::ConcurrentUpdate {
                ref_name: layout.ref_name.clone(),
                reason,
            }),
        }
    }

    /// Id of the current tip commit, or `""` when the reference is unset
    /// or the store cannot be read.
    pub fn get_version(&self) -> String {
        let resolved = self
            .provider
            .open()
            .and_then(|store| store.resolve_ref(&self.settings.layout.ref_name));
        match resolved {
            Ok(Some(id)) => id.to_string(),
            Ok(None) => String::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not open replication configuration repository");
                String::new()
            }
        }
    }

    /// Up to `max_count` most recent configuration commits, newest first.
    pub fn history(&self, max_count: usize) -> Result<Vec<CommitInfo>> {
        let store = self.provider.open()?;
        Ok(store.list_commits(&self.settings.layout.ref_name, max_count)?)
    }
}
