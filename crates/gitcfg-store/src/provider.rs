//! Store providers: how callers obtain a fresh store view per operation

use std::path::{Path, PathBuf};

use crate::{GitStore, ObjectStore, Result};

/// Opens a new, independent [`ObjectStore`] handle.
///
/// Every public configuration operation opens its own handle, so readers
/// and writers never share mutable store state between calls.
pub trait StoreProvider {
    type Store: ObjectStore;

    fn open(&self) -> Result<Self::Store>;
}

/// Opens the git repository at a fixed path.
#[derive(Debug, Clone)]
pub struct GitStoreProvider {
    path: PathBuf,
}

impl GitStoreProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreProvider for GitStoreProvider {
    type Store = GitStore;

    fn open(&self) -> Result<GitStore> {
        GitStore::open(&self.path)
    }
}
