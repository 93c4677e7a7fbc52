//! The configuration reference inside an ordinary working repository.

use gitcfg_core::{GitConfigOverrides, Settings};
use gitcfg_test_utils::config;
use gitcfg_test_utils::git::git_repo_with_commit;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_config_ref_does_not_touch_branches_or_worktree() {
    let temp = TempDir::new().unwrap();
    let repo = git_repo_with_commit(temp.path());
    let head_before = repo.head().unwrap().target().unwrap();

    let overrides = GitConfigOverrides::open(temp.path(), Settings::default());
    overrides
        .update(&config("[gerrit]\n\tautoReload = true\n[remote \"m\"]\n\turl = u\n"))
        .unwrap();

    assert_eq!(repo.head().unwrap().target().unwrap(), head_before);
    assert!(!temp.path().join("replication.config").exists());
    assert!(!temp.path().join("replication").exists());

    let tip = repo.refname_to_id("refs/meta/replication").unwrap();
    assert_eq!(overrides.get_version(), tip.to_string());
    let commit = repo.find_commit(tip).unwrap();
    assert_eq!(commit.parent_count(), 0);
    assert!(
        commit
            .tree()
            .unwrap()
            .get_path(std::path::Path::new("replication/m.config"))
            .is_ok()
    );
}

#[test]
fn test_open_from_worktree_subdirectory_is_not_supported() {
    let temp = TempDir::new().unwrap();
    git_repo_with_commit(temp.path());
    let nested = temp.path().join("sub");
    std::fs::create_dir(&nested).unwrap();

    let overrides = GitConfigOverrides::open(&nested, Settings::default());
    assert_eq!(overrides.get_version(), "");
    assert!(overrides.update(&config("[a]\n\tk = v\n")).is_err());
}
