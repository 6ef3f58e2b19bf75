//! Commits that go into a release's changelog

use crate::core::error::PromoResult;
use crate::core::vcs::{Commit, VersionControl};
use std::path::Path;
use tracing::debug;

/// Marker that keeps a commit out of the changelog when it starts the message
pub const DEFAULT_EXCLUDE_MARKER: &str = "[exclc]";

/// Commits since `tag`, minus those whose message starts with `exclude_marker`
///
/// An empty marker disables filtering.
pub fn commits_since(
  vcs: &dyn VersionControl,
  tag: &str,
  dir: &Path,
  exclude_marker: Option<&str>,
) -> PromoResult<Vec<Commit>> {
  let commits = vcs.commits_since(tag, dir)?;
  let total = commits.len();

  let kept: Vec<Commit> = commits
    .into_iter()
    .filter(|commit| !is_excluded(commit, exclude_marker))
    .collect();

  debug!(tag, total, excluded = total - kept.len(), "filtered commit history");
  Ok(kept)
}

fn is_excluded(commit: &Commit, marker: Option<&str>) -> bool {
  match marker {
    Some(marker) if !marker.is_empty() => commit.message.trim_start().starts_with(marker),
    _ => false,
  }
}
