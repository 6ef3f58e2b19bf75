//! Status command: promotions recorded in the version info file

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::config::PromoConfig;
use crate::core::error::{ConfigError, PromoError, PromoResult};
use crate::release::codec;
use crate::release::version_info::VersionInfo;
use crate::utils::resolve_against;

/// Promotion state of one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStatus {
  pub channel: String,
  /// Number of releases recorded for the channel
  pub releases: usize,
  pub latest: Option<String>,
  pub recommended: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
  file: &'a Path,
  homepage: &'a str,
  channels: &'a [ChannelStatus],
}

/// Run the status command
pub fn run_status(
  project_dir: &Path,
  version_info_file: Option<PathBuf>,
  channel: Option<String>,
  json: bool,
) -> PromoResult<()> {
  let config = PromoConfig::load(project_dir)?;
  let path = match version_info_file {
    Some(file) => resolve_against(project_dir, &file),
    None => config.version_info_path(project_dir).ok_or_else(|| {
      PromoError::Config(ConfigError::MissingField {
        field: "version_info_file".to_string(),
      })
    })?,
  };

  let document = codec::read(&path)?;
  let statuses = channel_statuses(&document, channel.as_deref());

  if json {
    let report = StatusReport {
      file: &path,
      homepage: &document.homepage,
      channels: &statuses,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_statuses(&path, &document, &statuses);
  }

  Ok(())
}

/// Status of every channel in the document, or of just `only`
pub fn channel_statuses(document: &VersionInfo, only: Option<&str>) -> Vec<ChannelStatus> {
  let status_of = |channel: &str| ChannelStatus {
    channel: channel.to_string(),
    releases: document.release_count(channel),
    latest: document.latest(channel).map(str::to_string),
    recommended: document.recommended(channel).map(str::to_string),
  };

  match only {
    Some(channel) => vec![status_of(channel)],
    None => document.channels().map(status_of).collect(),
  }
}

fn print_statuses(path: &Path, document: &VersionInfo, statuses: &[ChannelStatus]) {
  println!("📋 Version info: {}", path.display());
  if !document.homepage.is_empty() {
    println!("   Homepage: {}", document.homepage);
  }
  println!();

  if statuses.is_empty() {
    println!("⚠️  No channels recorded yet");
    return;
  }

  for status in statuses {
    let icon = if status.releases == 0 { "⚪" } else { "🟢" };
    println!("{} {}", icon, status.channel);
    println!("   Latest:      {}", status.latest.as_deref().unwrap_or("-"));
    println!("   Recommended: {}", status.recommended.as_deref().unwrap_or("-"));
    println!("   Releases:    {}", status.releases);
    println!();
  }
}
