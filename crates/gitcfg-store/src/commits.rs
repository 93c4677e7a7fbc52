//! Commit history extraction for a single reference.

use chrono::{DateTime, TimeZone, Utc};
use git2::{ErrorCode, Repository};

use crate::{ObjectId, Result};

/// Information about a single commit.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// Full commit id
    pub id: ObjectId,

    /// Parent commit ids, in order
    pub parents: Vec<ObjectId>,

    /// First line of the commit message
    pub message: String,

    /// Commit author name
    pub author: String,

    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

impl CommitInfo {
    /// Short commit hash (7 characters)
    pub fn short_id(&self) -> String {
        short_id(self.id)
    }
}

/// First 7 hex characters of `id`.
pub fn short_id(id: ObjectId) -> String {
    let mut hex = id.to_string();
    hex.truncate(7);
    hex
}

/// Walk the first `max_count` commits reachable from `refname`.
///
/// Returns commits in reverse-chronological order (most recent first), or
/// an empty list when the reference does not exist.
pub(crate) fn list_commits(
    repo: &Repository,
    refname: &str,
    max_count: usize,
) -> Result<Vec<CommitInfo>> {
    let tip = match repo.refname_to_id(refname) {
        Ok(id) => id,
        Err(e) if e.code() == ErrorCode::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut revwalk = repo.revwalk()?;
    revwalk.push(tip)?;
    revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;

    let mut commits = Vec::with_capacity(max_count.min(64));

    for oid_result in revwalk.take(max_count) {
        let oid = oid_result?;
        let commit = repo.find_commit(oid)?;

        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .unwrap_or_default();

        let message = commit
            .message()
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .to_string();

        let author = commit.author().name().unwrap_or("Unknown").to_string();

        commits.push(CommitInfo {
            id: oid,
            parents: commit.parent_ids().collect(),
            message,
            author,
            timestamp,
        });
    }

    Ok(commits)
}
