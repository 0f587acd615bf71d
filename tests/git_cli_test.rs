//! Integration tests for the git CLI repository against real temp repositories.

mod common;

use common::TestRepo;
use commitcraft::CommitMessage;
use commitcraft::error::GitError;
use commitcraft::git::{GitCli, GitRepository, find_workdir};

#[tokio::test]
async fn test_diff_reports_only_staged_changes() {
    let repo = TestRepo::new();
    repo.stage_file("README.md", "# demo\n");
    repo.commit_index("chore: initial commit");

    repo.stage_file("lib.rs", "pub fn staged() {}\n");
    repo.write_file("README.md", "# demo\nunstaged edit\n");

    let git = GitCli::new(repo.path());
    let diff = git.get_diff().await.unwrap();

    assert!(!diff.is_empty());
    assert!(diff.as_str().contains("+pub fn staged() {}"));
    assert!(!diff.as_str().contains("unstaged edit"));
}

#[tokio::test]
async fn test_diff_is_empty_when_nothing_staged() {
    let repo = TestRepo::new();
    repo.stage_file("README.md", "# demo\n");
    repo.commit_index("chore: initial commit");
    repo.write_file("README.md", "# changed but not staged\n");

    let git = GitCli::new(repo.path());
    assert!(git.get_diff().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_diff_outside_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    let git = GitCli::new(dir.path());

    // The temp dir may itself live inside a repository.
    if find_workdir(dir.path()).is_ok() {
        return;
    }

    let err = git.get_diff().await.unwrap_err();
    assert!(matches!(err, GitError::CommandFailed { operation: "diff", .. }));
}

#[tokio::test]
async fn test_commit_records_multi_line_message() {
    let repo = TestRepo::new();
    repo.stage_file("lib.rs", "pub fn x() {}\n");

    let message = CommitMessage::new("feat: add x\n\nAdds the x helper.").unwrap();
    let git = GitCli::new(repo.path());

    assert!(git.commit(&message).await);
    assert_eq!(repo.head_message().trim_end(), "feat: add x\n\nAdds the x helper.");
}

#[tokio::test]
async fn test_commit_with_nothing_staged_returns_false() {
    let repo = TestRepo::new();
    repo.stage_file("README.md", "# demo\n");
    repo.commit_index("chore: initial commit");

    let git = GitCli::new(repo.path());
    let message = CommitMessage::new("fix: nothing").unwrap();

    assert!(!git.commit(&message).await);
    assert_eq!(repo.head_message().trim_end(), "chore: initial commit");
}

#[test]
fn test_find_workdir_from_nested_directory() {
    let repo = TestRepo::new();
    let nested = repo.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    let workdir = find_workdir(&nested).unwrap();
    assert_eq!(
        workdir.canonicalize().unwrap(),
        repo.path().canonicalize().unwrap()
    );
}
