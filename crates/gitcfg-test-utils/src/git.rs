//! Git repository fixtures.

use std::path::Path;

/// Initialises an empty bare repository using `git2`.
///
/// Use for: tests that only touch objects and references, which is
/// everything the configuration store does.
///
/// # Panics
/// Panics if `git2::Repository::init_bare` fails.
pub fn bare_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init_bare(path).unwrap_or_else(|e| {
        panic!(
            "bare_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialises a non-bare repository with one commit on `HEAD`.
///
/// Use for: checking that the configuration ref lives alongside ordinary
/// branches without disturbing them.
///
/// # Panics
/// Panics if any git operation fails.
pub fn git_repo_with_commit(path: &Path) -> git2::Repository {
    let repo = git2::Repository::init(path)
        .unwrap_or_else(|e| panic!("git_repo_with_commit: failed to init repository: {e}"));
    {
        let sig = git2::Signature::now("Test User", "test@test.com")
            .unwrap_or_else(|e| panic!("git_repo_with_commit: signature: {e}"));
        let tree_id = repo
            .index()
            .and_then(|mut index| index.write_tree())
            .unwrap_or_else(|e| panic!("git_repo_with_commit: write tree: {e}"));
        let tree = repo
            .find_tree(tree_id)
            .unwrap_or_else(|e| panic!("git_repo_with_commit: find tree: {e}"));
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap_or_else(|e| panic!("git_repo_with_commit: commit: {e}"));
    }
    repo
}
