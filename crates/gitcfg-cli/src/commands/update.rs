//! Writing change sets

use std::path::Path;

use colored::Colorize;
use gitcfg_config::ConfigKey;
use gitcfg_core::{Config, ConfigBuilder, GitConfigOverrides, UpdateOutcome};
use gitcfg_store::{StoreProvider, short_id};

use crate::error::{CliError, Result};

/// Set `key` to `values`, replacing whatever the key held before.
pub fn run_set<P: StoreProvider>(
    overrides: &GitConfigOverrides<P>,
    key: &str,
    values: &[String],
) -> Result<()> {
    let delta = single_key_delta(overrides, key, values)?;
    report(overrides.update(&delta)?);
    Ok(())
}

/// Apply the configuration file at `file` as one change set.
pub fn run_apply<P: StoreProvider>(overrides: &GitConfigOverrides<P>, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file).map_err(|e| {
        CliError::user(format!("Cannot read '{}': {}", file.display(), e))
    })?;
    let delta = Config::parse(&text)?;
    if delta.is_empty() {
        return Err(CliError::user(format!(
            "'{}' contains no configuration",
            file.display()
        )));
    }
    report(overrides.update(&delta)?);
    Ok(())
}

/// Build the change set for a single-key edit.
///
/// Inside a subsection the whole key set of the subsection is replaced on
/// update, so the delta starts from the subsection's current keys.
fn single_key_delta<P: StoreProvider>(
    overrides: &GitConfigOverrides<P>,
    key: &str,
    values: &[String],
) -> Result<Config> {
    let key: ConfigKey = key.parse()?;
    let mut builder = ConfigBuilder::new();

    if let Some(subsection) = key.subsection() {
        let current = overrides.get_config();
        for name in current.names(&key.section, Some(subsection)) {
            builder.set_string_list(
                &key.section,
                Some(subsection),
                name,
                current.get_string_list(&key.section, Some(subsection), name).to_vec(),
            );
        }
    }

    builder.set_string_list(&key.section, key.subsection(), &key.name, values.to_vec());
    Ok(builder.build())
}

fn report(outcome: UpdateOutcome) {
    match outcome {
        UpdateOutcome::Committed { commit, previous } => {
            let short = short_id(commit);
            match previous {
                Some(previous) => println!(
                    "{} {} {} {}",
                    "Committed".green().bold(),
                    short.yellow(),
                    "on top of".dimmed(),
                    short_id(previous).yellow()
                ),
                None => println!("{} {}", "Committed".green().bold(), short.yellow()),
            }
        }
        UpdateOutcome::Unchanged => println!("{}", "No changes".dimmed()),
    }
}
