//! [`TestRepo`] for configuration store scenarios.

use std::path::Path;

use gitcfg_store::{GitStore, Identity, ObjectStore, TreeEdit};
use tempfile::TempDir;

use crate::git::bare_git_repo;

/// Reference the configuration lives at with default settings.
pub const CONFIG_REF: &str = "refs/meta/replication";

/// A temporary bare repository with helpers to seed and inspect raw tree
/// content at a reference, bypassing the configuration engine.
///
/// # Example
///
/// ```rust,no_run
/// use gitcfg_test_utils::repo::{CONFIG_REF, TestRepo};
///
/// let repo = TestRepo::new();
/// repo.seed(CONFIG_REF, &[("replication.config", "[gerrit]\n\tautoReload = true\n")]);
/// repo.assert_file_exists(CONFIG_REF, "replication.config");
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Create an empty bare repository in a temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        bare_git_repo(temp_dir.path());
        Self { temp_dir }
    }

    /// Return the repository path.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Open a fresh store handle on the repository.
    pub fn store(&self) -> GitStore {
        GitStore::open(self.path()).expect("TestRepo::store: failed to open repository")
    }

    /// Commit `files` on top of the current tip of `reference` and move the
    /// reference there. Existing files not named in `files` are kept.
    pub fn seed(&self, reference: &str, files: &[(&str, &str)]) {
        let store = self.store();
        let tip = store.resolve_ref(reference).unwrap();
        let base = tip.map(|commit| store.read_tree(commit).unwrap());

        let edits: Vec<TreeEdit> = files
            .iter()
            .map(|(path, content)| {
                TreeEdit::upsert(*path, store.write_blob(content.as_bytes()).unwrap())
            })
            .collect();
        let tree = store.build_tree(base, &edits).unwrap();
        let commit = store
            .commit(tip, tree, &Identity::new("Seeder", "seed@test.com"), "Seed")
            .unwrap();
        let result = store
            .compare_and_swap_ref(reference, tip, commit, "seed")
            .unwrap();
        assert!(result.is_success(), "TestRepo::seed: {result:?}");
    }

    /// Text of the blob at `path` in the tip tree of `reference`.
    pub fn file(&self, reference: &str, path: &str) -> Option<String> {
        let store = self.store();
        let commit = store.resolve_ref(reference).unwrap()?;
        let tree = store.read_tree(commit).unwrap();
        store
            .read_blob(tree, path)
            .unwrap()
            .map(|bytes| String::from_utf8(bytes).unwrap())
    }

    /// Names of the entries directly under `dir` in the tip tree, sorted.
    pub fn list(&self, reference: &str, dir: &str) -> Vec<String> {
        let store = self.store();
        let Some(commit) = store.resolve_ref(reference).unwrap() else {
            return Vec::new();
        };
        let tree = store.read_tree(commit).unwrap();
        let mut names: Vec<String> = store
            .list_dir(tree, dir)
            .unwrap()
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        names.sort();
        names
    }

    /// Number of commits reachable from `reference`.
    pub fn commit_count(&self, reference: &str) -> usize {
        self.store().list_commits(reference, usize::MAX).unwrap().len()
    }

    /// Assert that `path` exists in the tip tree of `reference`.
    ///
    /// # Panics
    /// Panics with a descriptive message if the blob does not exist.
    pub fn assert_file_exists(&self, reference: &str, path: &str) {
        assert!(
            self.file(reference, path).is_some(),
            "Expected {path} to exist at {reference}"
        );
    }

    /// Assert that the blob at `path` contains `content`.
    ///
    /// # Panics
    /// Panics if the blob is missing or does not contain `content`.
    pub fn assert_file_contains(&self, reference: &str, path: &str, content: &str) {
        let actual = self
            .file(reference, path)
            .unwrap_or_else(|| panic!("Expected {path} to exist at {reference}"));
        assert!(
            actual.contains(content),
            "{path} does not contain expected content.\nExpected: {content}\nActual: {actual}"
        );
    }
}
