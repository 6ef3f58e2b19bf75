//! Release command implementation
//!
//! Resolves settings from promo.toml and CLI flags, runs the release and, in
//! debug mode, prints what would have happened. A successful non-debug run
//! prints nothing.

use crate::core::config::{ConfigOverrides, PromoConfig};
use crate::core::error::PromoResult;
use crate::release::orchestrator::{self, DebugReport, ReleaseOutcome};
use std::path::Path;
use tracing::info;

/// Arguments of `release-promo release`
#[derive(Debug, Clone, Default)]
pub struct ReleaseArgs {
  pub new_version: Option<String>,
  pub overrides: ConfigOverrides,
  pub debug: bool,
}

/// Run the release command
pub fn run_release(project_dir: &Path, args: ReleaseArgs) -> PromoResult<()> {
  let config = PromoConfig::load(project_dir)?.with_overrides(args.overrides);
  let vcs = config.git();
  let settings = config.into_settings(project_dir, args.new_version, args.debug)?;

  let outcome = orchestrator::run(&settings, &vcs)?;

  if settings.debug {
    print_debug_reports(&outcome);
  } else {
    info!(
      release = %outcome.release_id,
      tag = ?outcome.tag,
      version_info_updated = outcome.version_info_updated,
      "release complete"
    );
  }

  Ok(())
}

fn print_debug_reports(outcome: &ReleaseOutcome) {
  println!("🔍 Debug mode (no changes applied)");
  println!("   Release:  {}", outcome.release_id);
  println!("   Since:    {}", outcome.previous_tag);
  println!();

  for report in &outcome.reports {
    match report {
      DebugReport::VersionInfo { path, content } => {
        println!("📄 Version info output ({}):", path.display());
        println!("{}", content);
      }
      DebugReport::VersionInfoGit {
        working_dir,
        relative_path,
        commit_message,
      } => {
        println!("   Git working dir:   {}", working_dir.display());
        println!("   Git add path:      {}", relative_path.display());
        println!("   Commit message:    {}", commit_message);
      }
      DebugReport::Changelog { path, content } => {
        println!("📝 Changelog output ({}):", path.display());
        if content.is_empty() {
          println!("   (no commits since {})", outcome.previous_tag);
        } else {
          println!("{}", content);
        }
      }
      DebugReport::Tag { name } => {
        println!("🏷️  Would tag {} and push tags", name);
      }
    }
    println!();
  }
}
