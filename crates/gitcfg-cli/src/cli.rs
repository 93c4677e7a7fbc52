//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gitcfg - Versioned replication configuration stored in a git reference
#[derive(Parser, Debug)]
#[command(name = "gitcfg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the git repository holding the configuration
    #[arg(short = 'C', long, global = true, env = "GITCFG_REPO", default_value = ".")]
    pub repo: PathBuf,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, env = "GITCFG_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the merged configuration
    Get {
        /// Output as JSON (`section[.subsection].key -> [values]`)
        #[arg(long)]
        json: bool,
    },

    /// Set one key, replacing all of its values
    ///
    /// Examples:
    ///   gitcfg set gerrit.autoReload true
    ///   gitcfg set remote.mirror.url git@mirror:${name}.git
    ///   gitcfg set remote.mirror.push +refs/heads/*:refs/heads/* +refs/tags/*:refs/tags/*
    Set {
        /// Key as section[.subsection].name
        key: String,

        /// One or more values
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Apply a configuration file as a change set
    ///
    /// Every subsection in the file replaces the stored subsection's keys;
    /// sections not in the file are left untouched.
    Apply {
        /// Path to a git-config style file
        file: PathBuf,
    },

    /// Print the current configuration version (empty when unset)
    Version,

    /// Show configuration history
    Log {
        /// Maximum number of commits to show
        #[arg(short = 'n', long, default_value_t = 10)]
        max_count: usize,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
