//! Commit walking for SystemGit

use super::Commit;
use super::system_git::SystemGit;
use crate::core::error::{GitError, PromoError, PromoResult};
use std::path::Path;
use tracing::debug;

impl SystemGit {
  /// Commits in `tag..HEAD`, each resolved with `git show`
  ///
  /// Order is whatever `git log` prints (newest first).
  pub(crate) fn log_range(&self, tag: &str, dir: &Path) -> PromoResult<Vec<Commit>> {
    let range = format!("{}..HEAD", tag);
    let log = self.run(dir, &["log", &range, "--oneline", "--no-decorate"])?;

    let hashes = parse_oneline_hashes(&log);
    debug!(range = %range, count = hashes.len(), "collected commit range");

    hashes.iter().map(|hash| self.show_commit(hash, dir)).collect()
  }

  /// Resolve author and message of a single commit
  pub(crate) fn show_commit(&self, hash: &str, dir: &Path) -> PromoResult<Commit> {
    let args = ["show", "--no-patch", "--format=medium", hash];
    let output = self.run(dir, &args)?;

    parse_show_output(hash, &output).map_err(|detail| {
      PromoError::Git(GitError::UnexpectedOutput {
        command: format!("git {}", args.join(" ")),
        detail,
      })
    })
  }
}

/// Abbreviated hashes from `git log --oneline` output
fn parse_oneline_hashes(output: &str) -> Vec<String> {
  output
    .lines()
    .filter(|line| !line.trim().is_empty())
    .filter_map(|line| line.split_whitespace().next())
    .map(str::to_string)
    .collect()
}

/// Parse `git show --format=medium` output
///
/// Layout (0-indexed lines):
/// ```text
/// 0  commit <hash>
/// 1  [Merge: <parents>]      only for merges, removed before indexing
/// 1  Author: <Name> <email>
/// 2  Date:   <date>
/// 3
/// 4      <first message line>
/// ```
fn parse_show_output(hash: &str, output: &str) -> Result<Commit, String> {
  let mut lines: Vec<&str> = output.lines().collect();

  if lines.get(1).is_some_and(|line| line.starts_with("Merge")) {
    lines.remove(1);
  }

  let author_line = lines
    .get(1)
    .ok_or_else(|| format!("missing author line for commit {}", hash))?;
  let author_name = parse_author_name(author_line)
    .ok_or_else(|| format!("expected 'Author:' line for commit {}, found '{}'", hash, author_line))?;

  // A commit with an empty message has no line 4
  let message = lines.get(4).map(|line| line.trim()).unwrap_or_default();

  Ok(Commit::new(hash, author_name, message))
}

/// `Author: Jane Doe <jane@example.com>` -> `Jane Doe`
fn parse_author_name(line: &str) -> Option<String> {
  let rest = line.strip_prefix("Author:")?;
  let name = match rest.find('<') {
    Some(start_of_email) => &rest[..start_of_email],
    None => rest,
  };
  Some(name.trim().to_string())
}
