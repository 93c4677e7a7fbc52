//! Object store trait and the value types it exchanges

use std::fmt;

use crate::{CommitInfo, Result};

/// Content address of a commit, tree or blob.
pub type ObjectId = git2::Oid;

/// Kind of a tree entry, derived from its file mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular, non-executable file (`100644`)
    File,
    /// Executable file (`100755`)
    Executable,
    /// Symbolic link (`120000`)
    Symlink,
    /// Subdirectory (`040000`)
    Tree,
    /// Gitlink to another repository (`160000`)
    Submodule,
}

impl EntryKind {
    pub(crate) fn from_mode(mode: i32) -> Option<Self> {
        match mode {
            0o100644 => Some(Self::File),
            0o100755 => Some(Self::Executable),
            0o120000 => Some(Self::Symlink),
            0o040000 => Some(Self::Tree),
            0o160000 => Some(Self::Submodule),
            _ => None,
        }
    }
}

/// Immediate child of a directory in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
    pub id: ObjectId,
}

/// Add-or-replace of a regular file at a slash-separated path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEdit {
    pub path: String,
    pub blob: ObjectId,
}

impl TreeEdit {
    pub fn upsert(path: impl Into<String>, blob: ObjectId) -> Self {
        Self {
            path: path.into(),
            blob,
        }
    }
}

/// Author and committer identity stamped on commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Why a compare-and-swap was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The reference no longer points at the expected commit.
    Modified,
    /// The new commit does not descend from the expected one.
    NonFastForward,
    /// Another writer holds the reference lock.
    LockFailure,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modified => write!(f, "reference was modified concurrently"),
            Self::NonFastForward => write!(f, "update is not a fast-forward"),
            Self::LockFailure => write!(f, "reference is locked"),
        }
    }
}

/// Result of a compare-and-swap on a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefUpdate {
    /// The reference did not exist and was created.
    New,
    /// The reference moved forward from the expected commit.
    FastForward,
    Rejected(RejectReason),
}

impl RefUpdate {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::New | Self::FastForward)
    }
}

/// Primitive operations on a content-addressed object store.
///
/// Tree paths are slash-separated and relative to the tree root. Absent
/// references and paths are reported as `None`, never as errors.
pub trait ObjectStore {
    /// Resolve a reference to the commit it points at.
    fn resolve_ref(&self, name: &str) -> Result<Option<ObjectId>>;

    /// Root tree of a commit.
    fn read_tree(&self, commit: ObjectId) -> Result<ObjectId>;

    /// Content of the blob at `path`, or `None` if nothing (or a non-blob) is there.
    fn read_blob(&self, tree: ObjectId, path: &str) -> Result<Option<Vec<u8>>>;

    /// Immediate entries of the directory at `path`, or `None` if it is absent.
    fn list_dir(&self, tree: ObjectId, path: &str) -> Result<Option<Vec<DirEntry>>>;

    fn write_blob(&self, content: &[u8]) -> Result<ObjectId>;

    /// Apply `edits` on top of `base` (or an empty tree) and write the result.
    fn build_tree(&self, base: Option<ObjectId>, edits: &[TreeEdit]) -> Result<ObjectId>;

    /// Write a commit object without touching any reference.
    fn commit(
        &self,
        parent: Option<ObjectId>,
        tree: ObjectId,
        identity: &Identity,
        message: &str,
    ) -> Result<ObjectId>;

    /// Point `name` at `new` only if it currently points at `expected`
    /// (`None` meaning the reference must not exist yet).
    fn compare_and_swap_ref(
        &self,
        name: &str,
        expected: Option<ObjectId>,
        new: ObjectId,
        log_message: &str,
    ) -> Result<RefUpdate>;

    /// Most recent commits reachable from `name`, newest first.
    fn list_commits(&self, name: &str, max_count: usize) -> Result<Vec<CommitInfo>>;
}
