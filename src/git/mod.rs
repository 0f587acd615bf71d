//! Git operations: repository discovery with git2, diff and commit via the git CLI.

pub mod cli;

use std::path::{Path, PathBuf};

use git2::Repository;

pub use cli::{GitCli, GitRepository};

/// Find the working directory of the repository containing `start`.
///
/// Searches parent directories like `git` itself does. Bare repositories have
/// no working directory and are rejected.
pub fn find_workdir(start: &Path) -> Result<PathBuf, git2::Error> {
    let repo = Repository::discover(start)?;
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| git2::Error::from_str("repository has no working directory"))
}
