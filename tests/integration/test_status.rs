//! Integration tests for `release-promo status`

use crate::helpers::{ReleaseFixture, run_release_promo};
use anyhow::Result;

#[test]
fn test_status_json_after_releases() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  fx.commit("Stable")?;
  run_release_promo(&fx.project, &["release", "--new-version", "1.0.1"])?;
  fx.commit("Beta")?;
  run_release_promo(&fx.project, &["release", "--new-version", "1.0.2", "--latest-only"])?;

  let output = run_release_promo(&fx.project, &["status", "--json"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["homepage"], "https://example.com/example-mod");
  let channels = json["channels"].as_array().expect("channels array");
  assert_eq!(channels.len(), 1);
  assert_eq!(channels[0]["channel"], "1.20.1");
  assert_eq!(channels[0]["releases"], 2);
  assert_eq!(channels[0]["latest"], "1.20.1-1.0.2");
  assert_eq!(channels[0]["recommended"], "1.20.1-1.0.1");

  Ok(())
}

#[test]
fn test_status_text_for_empty_document() -> Result<()> {
  let fx = ReleaseFixture::new()?;

  let output = run_release_promo(&fx.project, &["status"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("https://example.com/example-mod"), "stdout: {}", stdout);
  assert!(stdout.contains("No channels recorded yet"), "stdout: {}", stdout);

  Ok(())
}
