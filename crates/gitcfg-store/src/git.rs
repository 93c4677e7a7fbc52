//! `git2`-backed [`ObjectStore`]

use std::path::Path;

use git2::{Commit, ErrorCode, ObjectType, Repository, Signature};

use crate::store::{DirEntry, EntryKind, Identity, ObjectId, ObjectStore, RefUpdate, RejectReason, TreeEdit};
use crate::{CommitInfo, Error, Result, commits, tree};

/// Object store over a single git repository (bare or not).
///
/// A `GitStore` is one point-in-time handle; open a new one per operation
/// rather than sharing it across threads.
pub struct GitStore {
    repo: Repository,
}

impl GitStore {
    /// Open an existing repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|source| Error::RepositoryNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { repo })
    }

    /// Create a new bare repository at `path`.
    pub fn init_bare(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::init_bare(path)?;
        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }
}

fn not_found(e: &git2::Error) -> bool {
    e.code() == ErrorCode::NotFound
}

impl ObjectStore for GitStore {
    fn resolve_ref(&self, name: &str) -> Result<Option<ObjectId>> {
        match self.repo.refname_to_id(name) {
            Ok(id) => Ok(Some(id)),
            Err(e) if not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn read_tree(&self, commit: ObjectId) -> Result<ObjectId> {
        Ok(self.repo.find_commit(commit)?.tree_id())
    }

    fn read_blob(&self, tree: ObjectId, path: &str) -> Result<Option<Vec<u8>>> {
        let tree = self.repo.find_tree(tree)?;
        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if not_found(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if entry.kind() != Some(ObjectType::Blob) {
            return Ok(None);
        }
        let blob = self.repo.find_blob(entry.id())?;
        Ok(Some(blob.content().to_vec()))
    }

    fn list_dir(&self, tree: ObjectId, path: &str) -> Result<Option<Vec<DirEntry>>> {
        let root = self.repo.find_tree(tree)?;
        let dir = if path.is_empty() {
            root
        } else {
            let entry = match root.get_path(Path::new(path)) {
                Ok(entry) => entry,
                Err(e) if not_found(&e) => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            if entry.kind() != Some(ObjectType::Tree) {
                return Ok(None);
            }
            self.repo.find_tree(entry.id())?
        };

        let mut entries = Vec::with_capacity(dir.len());
        for entry in dir.iter() {
            let (Some(name), Some(kind)) = (entry.name(), EntryKind::from_mode(entry.filemode()))
            else {
                tracing::debug!(dir = %path, "Skipping tree entry with unsupported name or mode");
                continue;
            };
            entries.push(DirEntry {
                name: name.to_string(),
                kind,
                id: entry.id(),
            });
        }
        Ok(Some(entries))
    }

    fn write_blob(&self, content: &[u8]) -> Result<ObjectId> {
        Ok(self.repo.blob(content)?)
    }

    fn build_tree(&self, base: Option<ObjectId>, edits: &[TreeEdit]) -> Result<ObjectId> {
        let base = base.map(|id| self.repo.find_tree(id)).transpose()?;
        tree::write_edited(&self.repo, base.as_ref(), edits)
    }

    fn commit(
        &self,
        parent: Option<ObjectId>,
        tree: ObjectId,
        identity: &Identity,
        message: &str,
    ) -> Result<ObjectId> {
        let signature = Signature::now(&identity.name, &identity.email)?;
        let tree = self.repo.find_tree(tree)?;
        let parent = parent.map(|id| self.repo.find_commit(id)).transpose()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        Ok(self
            .repo
            .commit(None, &signature, &signature, message, &tree, &parents)?)
    }

    fn compare_and_swap_ref(
        &self,
        name: &str,
        expected: Option<ObjectId>,
        new: ObjectId,
        log_message: &str,
    ) -> Result<RefUpdate> {
        let result = match expected {
            None => match self.repo.reference(name, new, false, log_message) {
                Ok(_) => RefUpdate::New,
                Err(e) if e.code() == ErrorCode::Exists => RefUpdate::Rejected(RejectReason::Modified),
                Err(e) if e.code() == ErrorCode::Locked => {
                    RefUpdate::Rejected(RejectReason::LockFailure)
                }
                Err(e) => return Err(e.into()),
            },
            Some(old) => {
                if new != old && !self.repo.graph_descendant_of(new, old)? {
                    RefUpdate::Rejected(RejectReason::NonFastForward)
                } else {
                    match self.repo.reference_matching(name, new, true, old, log_message) {
                        Ok(_) => RefUpdate::FastForward,
                        Err(e) if matches!(e.code(), ErrorCode::Modified | ErrorCode::NotFound) => {
                            RefUpdate::Rejected(RejectReason::Modified)
                        }
                        Err(e) if e.code() == ErrorCode::Locked => {
                            RefUpdate::Rejected(RejectReason::LockFailure)
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        };

        tracing::debug!(
            reference = %name,
            new = %new,
            result = ?result,
            "Compare-and-swap on reference"
        );
        Ok(result)
    }

    fn list_commits(&self, name: &str, max_count: usize) -> Result<Vec<CommitInfo>> {
        commits::list_commits(&self.repo, name, max_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const REF: &str = "refs/meta/test";

    fn store() -> (TempDir, GitStore) {
        let temp = TempDir::new().unwrap();
        let store = GitStore::init_bare(temp.path()).unwrap();
        (temp, store)
    }

    fn identity() -> Identity {
        Identity::new("Test", "test@example.com")
    }

    #[test]
    fn test_resolve_missing_ref_is_none() {
        let (_temp, store) = store();
        assert_eq!(store.resolve_ref(REF).unwrap(), None);
    }

    #[test]
    fn test_build_tree_creates_nested_directories() {
        let (_temp, store) = store();
        let blob = store.write_blob(b"content").unwrap();
        let tree = store
            .build_tree(None, &[TreeEdit::upsert("dir/nested/file.txt", blob)])
            .unwrap();

        assert_eq!(
            store.read_blob(tree, "dir/nested/file.txt").unwrap(),
            Some(b"content".to_vec())
        );
        let listing = store.list_dir(tree, "dir").unwrap().unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "nested");
        assert_eq!(listing[0].kind, EntryKind::Tree);
    }

    #[test]
    fn test_build_tree_preserves_untouched_entries() {
        let (_temp, store) = store();
        let a = store.write_blob(b"a").unwrap();
        let b = store.write_blob(b"b").unwrap();
        let base = store
            .build_tree(None, &[TreeEdit::upsert("dir/a", a), TreeEdit::upsert("top", a)])
            .unwrap();
        let tree = store.build_tree(Some(base), &[TreeEdit::upsert("dir/b", b)]).unwrap();

        assert_eq!(store.read_blob(tree, "dir/a").unwrap(), Some(b"a".to_vec()));
        assert_eq!(store.read_blob(tree, "dir/b").unwrap(), Some(b"b".to_vec()));
        assert_eq!(store.read_blob(tree, "top").unwrap(), Some(b"a".to_vec()));
    }

    #[test]
    fn test_identical_edits_produce_identical_tree() {
        let (_temp, store) = store();
        let blob = store.write_blob(b"same").unwrap();
        let base = store.build_tree(None, &[TreeEdit::upsert("f", blob)]).unwrap();
        let rebuilt = store.build_tree(Some(base), &[TreeEdit::upsert("f", blob)]).unwrap();
        assert_eq!(base, rebuilt);
    }

    #[test]
    fn test_read_blob_on_directory_is_none() {
        let (_temp, store) = store();
        let blob = store.write_blob(b"x").unwrap();
        let tree = store.build_tree(None, &[TreeEdit::upsert("dir/f", blob)]).unwrap();
        assert_eq!(store.read_blob(tree, "dir").unwrap(), None);
        assert_eq!(store.list_dir(tree, "dir/f").unwrap(), None);
        assert_eq!(store.list_dir(tree, "missing").unwrap(), None);
    }

    #[test]
    fn test_compare_and_swap_lifecycle() {
        let (_temp, store) = store();
        let tree = store.build_tree(None, &[]).unwrap();
        let first = store.commit(None, tree, &identity(), "first").unwrap();
        let second = store.commit(Some(first), tree, &identity(), "second").unwrap();

        assert_eq!(
            store.compare_and_swap_ref(REF, None, first, "create").unwrap(),
            RefUpdate::New
        );
        // Creating again must not clobber the existing reference
        assert_eq!(
            store.compare_and_swap_ref(REF, None, second, "create").unwrap(),
            RefUpdate::Rejected(RejectReason::Modified)
        );
        assert_eq!(
            store.compare_and_swap_ref(REF, Some(first), second, "advance").unwrap(),
            RefUpdate::FastForward
        );
        assert_eq!(
            store.compare_and_swap_ref(REF, Some(first), second, "stale").unwrap(),
            RefUpdate::Rejected(RejectReason::Modified)
        );
        assert_eq!(store.resolve_ref(REF).unwrap(), Some(second));
    }

    #[test]
    fn test_compare_and_swap_rejects_non_fast_forward() {
        let (_temp, store) = store();
        let tree = store.build_tree(None, &[]).unwrap();
        let first = store.commit(None, tree, &identity(), "first").unwrap();
        let unrelated = store.commit(None, tree, &identity(), "unrelated").unwrap();
        store.compare_and_swap_ref(REF, None, first, "create").unwrap();

        assert_eq!(
            store.compare_and_swap_ref(REF, Some(first), unrelated, "jump").unwrap(),
            RefUpdate::Rejected(RejectReason::NonFastForward)
        );
    }

    #[test]
    fn test_list_commits_newest_first() {
        let (_temp, store) = store();
        let tree = store.build_tree(None, &[]).unwrap();
        let first = store.commit(None, tree, &identity(), "first").unwrap();
        let second = store.commit(Some(first), tree, &identity(), "second\n\nbody").unwrap();
        store.compare_and_swap_ref(REF, None, second, "create").unwrap();

        let history = store.list_commits(REF, 10).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second);
        assert_eq!(history[0].message, "second");
        assert_eq!(history[0].parents, vec![first]);
        assert_eq!(history[1].author, "Test");
        assert!(store.list_commits("refs/meta/missing", 10).unwrap().is_empty());
    }
}
