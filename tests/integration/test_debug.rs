//! Integration tests for `release-promo release --debug`

use crate::helpers::{ReleaseFixture, run_release_promo, run_release_promo_unchecked};
use anyhow::Result;

#[test]
fn test_debug_prints_outputs_and_changes_nothing() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  fx.commit("Add feature")?;

  let output = run_release_promo(&fx.project, &["release", "--new-version", "1.0.1", "--debug"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("- Add feature [Test User]"), "stdout: {}", stdout);
  assert!(stdout.contains("\"1.20.1-1.0.1\""), "stdout: {}", stdout);
  assert!(stdout.contains("Update version info for Example Mod"), "stdout: {}", stdout);
  assert!(stdout.contains("version_info.json"), "stdout: {}", stdout);

  assert!(!fx.project.join("build/changelog.txt").exists());
  assert_eq!(fx.published_commit_count()?, 1);
  assert!(!fx.remote_tags()?.contains(&"1.0.1".to_string()));
  let local = std::fs::read_to_string(fx.updates.join("version_info.json"))?;
  assert!(!local.contains("1.0.1"), "local copy modified:\n{}", local);

  Ok(())
}

#[test]
fn test_debug_still_rejects_malformed_document() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  std::fs::write(fx.updates.join("version_info.json"), "[1, 2, 3]")?;

  let output = run_release_promo_unchecked(&fx.project, &["release", "--new-version", "1.0.1", "--debug"])?;

  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("must be an object"), "stderr: {}", stderr);

  Ok(())
}
