//! Changelog preview: what the next release's changelog would contain

use crate::core::config::PromoConfig;
use crate::core::error::PromoResult;
use crate::core::vcs::{Commit, VersionControl};
use crate::release::{changelog, history};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ChangelogPreview<'a> {
  since: &'a str,
  commits: &'a [Commit],
  text: String,
}

/// Run the changelog command
pub fn run_changelog(
  project_dir: &Path,
  since: Option<String>,
  exclude_marker: Option<String>,
  json: bool,
) -> PromoResult<()> {
  let mut config = PromoConfig::load(project_dir)?;
  if exclude_marker.is_some() {
    config.exclude_marker = exclude_marker;
  }
  let vcs = config.git();

  let since = match since {
    Some(since) => since,
    None => vcs.last_tag(project_dir)?,
  };
  let commits = history::commits_since(&vcs, &since, project_dir, config.exclude_marker().as_deref())?;
  let text = changelog::render(&commits);

  if json {
    let preview = ChangelogPreview {
      since: &since,
      commits: &commits,
      text,
    };
    println!("{}", serde_json::to_string_pretty(&preview)?);
  } else if !text.is_empty() {
    println!("{}", text);
  }

  Ok(())
}
