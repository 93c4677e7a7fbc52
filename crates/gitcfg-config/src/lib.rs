//! Configuration value model for gitcfg
//!
//! An ordered `section -> subsection -> key -> [values]` structure with a
//! git-config style text encoding. Values are immutable once built; all
//! mutation goes through [`ConfigBuilder`].

pub mod error;
pub mod key;
pub mod model;
pub mod text;

pub use error::{Error, Result};
pub use key::ConfigKey;
pub use model::{Config, ConfigBuilder};
