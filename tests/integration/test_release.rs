//! Integration tests for `release-promo release`

use crate::helpers::{ReleaseFixture, run_release_promo, run_release_promo_unchecked};
use anyhow::Result;

#[test]
fn test_release_publishes_changelog_version_info_and_tag() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  fx.commit("Add config screen")?;
  fx.commit("Fix crash on startup")?;

  let output = run_release_promo(&fx.project, &["release", "--new-version", "1.0.1"])?;
  assert!(output.stdout.is_empty(), "successful release should print nothing");

  // Newest commit first, as git log lists them
  let changelog = fx.read_project_file("build/changelog.txt")?;
  assert_eq!(
    changelog,
    "- Fix crash on startup [Test User]\n- Add config screen [Test User]"
  );

  let doc = fx.published_version_info()?;
  assert_eq!(doc["homepage"], "https://example.com/example-mod");
  assert_eq!(doc["1.20.1"]["1.20.1-1.0.1"], changelog.as_str());
  assert_eq!(doc["promos"]["1.20.1-latest"], "1.20.1-1.0.1");
  assert_eq!(doc["promos"]["1.20.1-recommended"], "1.20.1-1.0.1");

  assert_eq!(fx.published_subject()?, "Update version info for Example Mod");
  assert!(fx.remote_tags()?.contains(&"1.0.1".to_string()));

  Ok(())
}

#[test]
fn test_release_writes_promos_last() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  fx.commit("Add config screen")?;

  run_release_promo(&fx.project, &["release", "--new-version", "1.0.1"])?;

  let text = std::fs::read_to_string(fx.updates.join("version_info.json"))?;
  let homepage = text.find("\"homepage\"").unwrap();
  let channel = text.find("\"1.20.1\"").unwrap();
  let promos = text.find("\"promos\"").unwrap();
  assert!(homepage < channel && channel < promos, "unexpected key order:\n{}", text);
  assert!(text.starts_with("{\n  \"homepage\""), "expected 2-space indent:\n{}", text);

  Ok(())
}

#[test]
fn test_latest_only_leaves_recommended_untouched() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  fx.commit("Stable feature")?;
  run_release_promo(&fx.project, &["release", "--new-version", "1.0.1"])?;

  fx.commit("Experimental feature")?;
  run_release_promo(&fx.project, &["release", "--new-version", "1.0.2-beta", "--latest-only"])?;

  let doc = fx.published_version_info()?;
  assert_eq!(doc["promos"]["1.20.1-latest"], "1.20.1-1.0.2-beta");
  assert_eq!(doc["promos"]["1.20.1-recommended"], "1.20.1-1.0.1");
  assert_eq!(doc["1.20.1"]["1.20.1-1.0.2-beta"], "- Experimental feature [Test User]");
  assert_eq!(doc["1.20.1"]["1.20.1-1.0.1"], "- Stable feature [Test User]");

  Ok(())
}

#[test]
fn test_exclude_marker_filters_commits() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  fx.commit("Add feature")?;
  fx.commit("[exclc] Bump build tooling")?;
  fx.commit("Fix feature")?;

  run_release_promo(&fx.project, &["release", "--new-version", "1.0.1"])?;

  let changelog = fx.read_project_file("build/changelog.txt")?;
  assert_eq!(changelog, "- Fix feature [Test User]\n- Add feature [Test User]");

  Ok(())
}

#[test]
fn test_custom_exclude_marker_and_tag_prefix() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  fx.write_config(
    r#"channel = "1.20.1"
project_name = "Example Mod"
version_info_file = "../updates/version_info.json"
exclude_marker = "[skip]"
tag_prefix = "v"
changelog_output_file = "dist/CHANGELOG.txt"
"#,
  )?;
  fx.commit("[exclc] Kept because the marker changed")?;
  fx.commit("[skip] Internal cleanup")?;

  run_release_promo(&fx.project, &["release", "--new-version", "1.0.1"])?;

  let changelog = fx.read_project_file("dist/CHANGELOG.txt")?;
  assert_eq!(changelog, "- [exclc] Kept because the marker changed [Test User]");
  assert!(fx.remote_tags()?.contains(&"v1.0.1".to_string()));

  Ok(())
}

#[test]
fn test_release_without_new_commits_records_empty_changelog() -> Result<()> {
  let fx = ReleaseFixture::new()?;

  run_release_promo(&fx.project, &["release", "--new-version", "1.0.1"])?;

  assert_eq!(fx.read_project_file("build/changelog.txt")?, "");
  let doc = fx.published_version_info()?;
  assert_eq!(doc["1.20.1"]["1.20.1-1.0.1"], "");

  Ok(())
}

#[test]
fn test_release_without_version_info_file_only_writes_changelog_and_tags() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  fx.write_config("channel = \"1.20.1\"\n")?;
  fx.commit("Add feature")?;

  run_release_promo(&fx.project, &["release", "--new-version", "1.0.1"])?;

  assert_eq!(fx.read_project_file("build/changelog.txt")?, "- Add feature [Test User]");
  assert_eq!(fx.published_commit_count()?, 1);
  assert!(fx.remote_tags()?.contains(&"1.0.1".to_string()));

  Ok(())
}

#[test]
fn test_missing_version_info_file_fails_with_document_exit_code() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  fx.commit("Add feature")?;

  let output = run_release_promo_unchecked(
    &fx.project,
    &["release", "--new-version", "1.0.1", "--version-info-file", "../updates/missing.json"],
  )?;

  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("missing.json"), "stderr: {}", stderr);
  assert_eq!(fx.published_commit_count()?, 1);
  assert!(!fx.remote_tags()?.contains(&"1.0.1".to_string()));

  Ok(())
}

#[test]
fn test_missing_new_version_is_a_user_error() -> Result<()> {
  let fx = ReleaseFixture::new()?;

  let output = run_release_promo_unchecked(&fx.project, &["release"])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("new_version"), "stderr: {}", stderr);

  Ok(())
}

#[test]
fn test_project_dir_flag() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  fx.commit("Add feature")?;

  let project = fx.project.to_string_lossy().to_string();
  run_release_promo(&fx.root, &["-C", &project, "release", "--new-version", "1.0.1"])?;

  assert_eq!(fx.read_project_file("build/changelog.txt")?, "- Add feature [Test User]");

  Ok(())
}

#[test]
fn test_current_dir_project_takes_name_from_directory() -> Result<()> {
  let fx = ReleaseFixture::new()?;
  fx.write_config("channel = \"1.20.1\"\nversion_info_file = \"../updates/version_info.json\"\n")?;
  fx.commit("Add feature")?;

  run_release_promo(&fx.project, &["-C", ".", "release", "--new-version", "1.0.1"])?;

  assert_eq!(fx.published_subject()?, "Update version info for project");
  assert_eq!(fx.read_project_file("build/changelog.txt")?, "- Add feature [Test User]");

  Ok(())
}
