//! Writers racing on the configuration reference.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use gitcfg_core::{Config, Error, GitConfigOverrides, Settings, UpdateOutcome};
use gitcfg_store::{
    CommitInfo, DirEntry, GitStore, GitStoreProvider, Identity, ObjectId, ObjectStore, RefUpdate,
    RejectReason, Result, StoreProvider, TreeEdit,
};
use gitcfg_test_utils::config;
use gitcfg_test_utils::repo::{CONFIG_REF, TestRepo};
use pretty_assertions::assert_eq;

/// Provider whose next store lets a competing writer publish its change
/// right before the reference is swapped.
struct RacingProvider {
    path: PathBuf,
    competing: RefCell<Option<Config>>,
}

impl RacingProvider {
    fn new(path: impl Into<PathBuf>, competing: Config) -> Self {
        Self {
            path: path.into(),
            competing: RefCell::new(Some(competing)),
        }
    }
}

struct RacingStore {
    inner: GitStore,
    path: PathBuf,
    competing: Option<Config>,
}

impl StoreProvider for RacingProvider {
    type Store = RacingStore;

    fn open(&self) -> Result<RacingStore> {
        Ok(RacingStore {
            inner: GitStore::open(&self.path)?,
            path: self.path.clone(),
            competing: self.competing.borrow_mut().take(),
        })
    }
}

impl ObjectStore for RacingStore {
    fn resolve_ref(&self, name: &str) -> Result<Option<ObjectId>> {
        self.inner.resolve_ref(name)
    }

    fn read_tree(&self, commit: ObjectId) -> Result<ObjectId> {
        self.inner.read_tree(commit)
    }

    fn read_blob(&self, tree: ObjectId, path: &str) -> Result<Option<Vec<u8>>> {
        self.inner.read_blob(tree, path)
    }

    fn list_dir(&self, tree: ObjectId, path: &str) -> Result<Option<Vec<DirEntry>>> {
        self.inner.list_dir(tree, path)
    }

    fn write_blob(&self, content: &[u8]) -> Result<ObjectId> {
        self.inner.write_blob(content)
    }

    fn build_tree(&self, base: Option<ObjectId>, edits: &[TreeEdit]) -> Result<ObjectId> {
        self.inner.build_tree(base, edits)
    }

    fn commit(
        &self,
        parent: Option<ObjectId>,
        tree: ObjectId,
        identity: &Identity,
        message: &str,
    ) -> Result<ObjectId> {
        self.inner.commit(parent, tree, identity, message)
    }

    fn compare_and_swap_ref(
        &self,
        name: &str,
        expected: Option<ObjectId>,
        new: ObjectId,
        log_message: &str,
    ) -> Result<RefUpdate> {
        if let Some(competing) = &self.competing {
            let outcome = GitConfigOverrides::open(&self.path, Settings::default())
                .update(competing)
                .unwrap();
            assert!(matches!(outcome, UpdateOutcome::Committed { .. }));
        }
        self.inner.compare_and_swap_ref(name, expected, new, log_message)
    }

    fn list_commits(&self, name: &str, max_count: usize) -> Result<Vec<CommitInfo>> {
        self.inner.list_commits(name, max_count)
    }
}

#[test]
fn test_first_writer_wins_on_empty_reference() {
    let repo = TestRepo::new();
    let racing = GitConfigOverrides::new(
        RacingProvider::new(repo.path(), config("[remote \"first\"]\n\turl = one\n")),
        Settings::default(),
    );

    let err = racing
        .update(&config("[remote \"second\"]\n\turl = two\n"))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ConcurrentUpdate { ref ref_name, reason: RejectReason::Modified } if ref_name == CONFIG_REF
    ));

    let current = GitConfigOverrides::open(repo.path(), Settings::default()).get_config();
    assert_eq!(current.subsections("remote"), vec!["first"]);
    assert_eq!(repo.commit_count(CONFIG_REF), 1);
}

#[test]
fn test_stale_writer_is_rejected_and_can_retry() {
    let repo = TestRepo::new();
    let plain = GitConfigOverrides::open(repo.path(), Settings::default());
    plain.update(&config("[gerrit]\n\tautoReload = true\n")).unwrap();

    let racing = GitConfigOverrides::new(
        RacingProvider::new(repo.path(), config("[remote \"first\"]\n\turl = one\n")),
        Settings::default(),
    );
    let delta = config("[remote \"second\"]\n\turl = two\n");
    assert!(matches!(
        racing.update(&delta),
        Err(Error::ConcurrentUpdate { .. })
    ));
    assert_eq!(repo.commit_count(CONFIG_REF), 2);

    // The competing change has been consumed; a retry re-reads and succeeds.
    racing.update(&delta).unwrap();
    let current = plain.get_config();
    assert_eq!(current.subsections("remote"), vec!["first", "second"]);
    assert_eq!(current.get_string("gerrit", None, "autoReload"), Some("true"));
    assert_eq!(repo.commit_count(CONFIG_REF), 3);
}

#[test]
fn test_parallel_writers_with_retry_lose_nothing() {
    let repo = TestRepo::new();
    let overrides = Arc::new(GitConfigOverrides::<GitStoreProvider>::open(
        repo.path(),
        Settings::default(),
    ));

    let handles: Vec<_> = (0..4)
        .map(|writer| {
            let overrides = Arc::clone(&overrides);
            thread::spawn(move || {
                let delta = config(&format!("[remote \"writer{writer}\"]\n\turl = u{writer}\n"));
                loop {
                    match overrides.update(&delta) {
                        Ok(_) => break,
                        Err(Error::ConcurrentUpdate { .. }) => continue,
                        Err(e) => panic!("writer {writer}: {e}"),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let current = overrides.get_config();
    assert_eq!(
        current.subsections("remote"),
        vec!["writer0", "writer1", "writer2", "writer3"]
    );
    assert_eq!(repo.commit_count(CONFIG_REF), 4);
}
