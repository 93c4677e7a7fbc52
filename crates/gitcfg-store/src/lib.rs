//! git object store adapter for gitcfg
//!
//! Exposes the handful of object and reference primitives the configuration
//! engine needs through the [`ObjectStore`] trait, backed by `git2`.

pub mod commits;
pub mod error;
pub mod git;
pub mod provider;
pub mod store;
mod tree;

pub use commits::{CommitInfo, short_id};
pub use error::{Error, Result};
pub use git::GitStore;
pub use provider::{GitStoreProvider, StoreProvider};
pub use store::{DirEntry, EntryKind, Identity, ObjectId, ObjectStore, RefUpdate, RejectReason, TreeEdit};
