//! The release procedure
//!
//! One linear pass per run:
//!
//! 1. Build the changelog from `last_tag..HEAD`. The tag is read before this
//!    run creates its own, otherwise the new tag would bound its own range.
//! 2. If a version info file is configured: pull its repository, decode,
//!    merge the new release, write, then add/commit/push.
//! 3. Write the changelog output, tag the new version, push tags.
//!
//! Debug mode runs every read and validation step but replaces each mutating
//! step with a [`DebugReport`].
//!
//! # Concurrent runs
//!
//! Pulling right before the read and pushing right after the write only
//! narrows the window in which two runs can race on the same file. A run
//! that pulls between another run's pull and push rewrites the whole file from
//! its own copy and drops the other run's entry. There is no lock over the
//! remote; a rejected push fails the run and it has to be repeated.

use super::{changelog, codec, history};
use crate::core::config::ReleaseSettings;
use crate::core::error::{PromoError, PromoResult, ResultExt, Stage};
use crate::core::vcs::VersionControl;
use crate::utils::split_containing_dir;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Something a debug run would have done
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugReport {
  /// Version info document as it would be written
  VersionInfo { path: PathBuf, content: String },
  /// Git steps that would publish the version info document
  VersionInfoGit {
    working_dir: PathBuf,
    relative_path: PathBuf,
    commit_message: String,
  },
  /// Changelog text as it would be written
  Changelog { path: PathBuf, content: String },
  /// Tag that would be created and pushed
  Tag { name: String },
}

/// Result of a release run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
  /// Tag the changelog was computed from
  pub previous_tag: String,
  pub changelog: String,
  pub release_id: String,
  /// Whether a version info document was updated (or would have been)
  pub version_info_updated: bool,
  /// Tag created by this run, `None` in debug mode
  pub tag: Option<String>,
  /// Intended actions, only populated in debug mode
  pub reports: Vec<DebugReport>,
}

/// Run a release
pub fn run(settings: &ReleaseSettings, vcs: &dyn VersionControl) -> PromoResult<ReleaseOutcome> {
  let project_dir = settings.project_dir.as_path();
  let release_id = settings.release_id();

  let (previous_tag, changelog) = build_changelog(settings, vcs).stage(Stage::BuildChangelog)?;
  info!(previous_tag = %previous_tag, release = %release_id, "built changelog");

  let mut outcome = ReleaseOutcome {
    previous_tag,
    changelog,
    release_id,
    version_info_updated: false,
    tag: None,
    reports: Vec::new(),
  };

  if let Some(version_info_file) = &settings.version_info_file {
    update_version_info(settings, vcs, version_info_file, &mut outcome)?;
    outcome.version_info_updated = true;
  }

  if settings.debug {
    outcome.reports.push(DebugReport::Changelog {
      path: settings.changelog_output_file.clone(),
      content: outcome.changelog.clone(),
    });
    outcome.reports.push(DebugReport::Tag {
      name: settings.tag_name(),
    });
    return Ok(outcome);
  }

  write_text(&settings.changelog_output_file, &outcome.changelog).stage(Stage::WriteChangelog)?;
  info!(path = %settings.changelog_output_file.display(), "wrote changelog");

  let tag = settings.tag_name();
  vcs
    .create_tag(&tag, project_dir)
    .and_then(|()| vcs.push_tags(project_dir))
    .stage(Stage::TagRelease)?;
  info!(tag = %tag, "tagged and pushed release");
  outcome.tag = Some(tag);

  Ok(outcome)
}

/// Last tag and the changelog text since it
pub fn build_changelog(settings: &ReleaseSettings, vcs: &dyn VersionControl) -> PromoResult<(String, String)> {
  let project_dir = settings.project_dir.as_path();
  let last_tag = vcs.last_tag(project_dir)?;
  let commits = history::commits_since(vcs, &last_tag, project_dir, settings.exclude_marker.as_deref())?;
  Ok((last_tag, changelog::render(&commits)))
}

fn update_version_info(
  settings: &ReleaseSettings,
  vcs: &dyn VersionControl,
  path: &Path,
  outcome: &mut ReleaseOutcome,
) -> PromoResult<()> {
  let (working_dir, relative_path) = split_containing_dir(path);

  if !settings.debug {
    vcs.pull(&working_dir).stage(Stage::SyncVersionInfo)?;
  }

  let mut document = codec::read(path).stage(Stage::ReadVersionInfo)?;
  document.add_version(settings.promotion, &settings.channel, &outcome.release_id, &outcome.changelog);

  if settings.debug {
    let content = codec::encode(&document).stage(Stage::WriteVersionInfo)?;
    outcome.reports.push(DebugReport::VersionInfo {
      path: path.to_path_buf(),
      content,
    });
    outcome.reports.push(DebugReport::VersionInfoGit {
      working_dir,
      relative_path,
      commit_message: settings.commit_message(),
    });
    return Ok(());
  }

  codec::write(path, &document).stage(Stage::WriteVersionInfo)?;
  info!(path = %path.display(), channel = %settings.channel, promotion = ?settings.promotion, "updated version info");

  vcs
    .add(&relative_path, &working_dir)
    .and_then(|()| vcs.commit(&settings.commit_message(), &working_dir))
    .and_then(|()| vcs.push(&working_dir))
    .stage(Stage::PublishVersionInfo)?;
  info!(dir = %working_dir.display(), "pushed version info");

  Ok(())
}

fn write_text(path: &Path, content: &str) -> PromoResult<()> {
  let to_write_error = |source| PromoError::Write {
    path: path.to_path_buf(),
    source,
  };

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(to_write_error)?;
  }
  fs::write(path, content).map_err(to_write_error)
}
