//! Version and history inspection

use colored::Colorize;
use gitcfg_core::GitConfigOverrides;
use gitcfg_store::StoreProvider;

use crate::error::Result;

/// Print the current version token. Prints an empty line when unset.
pub fn run_version<P: StoreProvider>(overrides: &GitConfigOverrides<P>) -> Result<()> {
    println!("{}", overrides.get_version());
    Ok(())
}

/// Print up to `max_count` configuration commits, newest first.
pub fn run_log<P: StoreProvider>(
    overrides: &GitConfigOverrides<P>,
    max_count: usize,
    json: bool,
) -> Result<()> {
    let commits = overrides.history(max_count)?;

    if json {
        let output: Vec<_> = commits
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id.to_string(),
                    "parents": c.parents.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "author": c.author,
                    "message": c.message,
                    "timestamp": c.timestamp.to_rfc3339(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if commits.is_empty() {
        println!("{}", "No configuration history".dimmed());
        return Ok(());
    }

    for commit in &commits {
        println!(
            "{} {} {} {}",
            commit.short_id().yellow(),
            commit.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            commit.author.cyan(),
            commit.message
        );
    }
    Ok(())
}
