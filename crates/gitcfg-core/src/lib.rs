//! Replication configuration stored in a git reference
//!
//! The logical configuration lives at the tip of a dedicated reference in
//! two physical layouts: a root config blob for general sections, and an
//! optional fanout directory with one file per `remote`. This crate merges
//! the two on read, splits a change set back into blobs on write, and
//! publishes each write as a single commit guarded by compare-and-swap.

pub mod engine;
pub mod error;
pub mod overrides;
pub mod section;
pub mod settings;
pub mod warning;

pub use engine::{BlobWrite, ConfigEngine, SplitPlan};
pub use error::{Error, Result};
pub use overrides::{GitConfigOverrides, UpdateOutcome};
pub use section::SectionKind;
pub use settings::{IdentitySettings, LayoutSettings, Settings};
pub use warning::{MergedConfig, Warning};

pub use gitcfg_config::{Config, ConfigBuilder};
