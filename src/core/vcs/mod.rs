pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use crate::core::error::PromoResult;
use serde::Serialize;
use std::path::Path;

/// A commit as it appears in the changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
  pub hash: String,
  pub author_name: String,
  /// First line of the commit message
  pub message: String,
}

impl Commit {
  pub fn new(hash: impl Into<String>, author_name: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      hash: hash.into(),
      author_name: author_name.into(),
      message: message.into(),
    }
  }
}

/// Version control operations a release run needs.
///
/// Every call blocks until the underlying command exits and takes the working
/// directory explicitly: the project repository and the repository holding the
/// version info file are not necessarily the same.
pub trait VersionControl {
  /// Most recent tag reachable from HEAD
  fn last_tag(&self, dir: &Path) -> PromoResult<String>;

  /// Commits in `tag..HEAD`, in log order
  fn commits_since(&self, tag: &str, dir: &Path) -> PromoResult<Vec<Commit>>;

  fn pull(&self, dir: &Path) -> PromoResult<()>;

  fn add(&self, relative_path: &Path, dir: &Path) -> PromoResult<()>;

  fn commit(&self, message: &str, dir: &Path) -> PromoResult<()>;

  fn push(&self, dir: &Path) -> PromoResult<()>;

  fn create_tag(&self, name: &str, dir: &Path) -> PromoResult<()>;

  fn push_tags(&self, dir: &Path) -> PromoResult<()>;
}
