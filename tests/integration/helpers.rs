//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Version info document every fixture starts from
pub const SEED_VERSION_INFO: &str = r#"{
  "homepage": "https://example.com/example-mod",
  "promos": {}
}"#;

/// A project repo plus a version info working copy, each with a bare remote
///
/// Layout under the temp root:
/// ```text
/// project/           git repo with tag 1.0.0 and promo.toml
/// project-remote.git
/// updates/           clone of updates-remote.git holding version_info.json
/// updates-remote.git
/// ```
pub struct ReleaseFixture {
  _root: TempDir,
  pub root: PathBuf,
  pub project: PathBuf,
  pub updates: PathBuf,
  pub updates_remote: PathBuf,
  pub project_remote: PathBuf,
}

impl ReleaseFixture {
  /// Create a fixture with one tagged commit and a seeded version info file
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    let updates_remote = path.join("updates-remote.git");
    let project_remote = path.join("project-remote.git");
    git(&path, &["init", "--bare", "--initial-branch=main", "updates-remote.git"])?;
    git(&path, &["init", "--bare", "--initial-branch=main", "project-remote.git"])?;

    // Version info working copy
    let updates = path.join("updates");
    std::fs::create_dir_all(&updates)?;
    init_repo(&updates)?;
    git(&updates, &["remote", "add", "origin", &updates_remote.to_string_lossy()])?;
    std::fs::write(updates.join("version_info.json"), SEED_VERSION_INFO)?;
    git(&updates, &["add", "."])?;
    git(&updates, &["commit", "-m", "Seed version info"])?;
    git(&updates, &["push", "-u", "origin", "main"])?;

    // Project with a release tag to start from
    let project = path.join("project");
    std::fs::create_dir_all(&project)?;
    init_repo(&project)?;
    git(&project, &["remote", "add", "origin", &project_remote.to_string_lossy()])?;
    std::fs::write(project.join("README.md"), "# Example Mod\n")?;
    git(&project, &["add", "README.md"])?;
    git(&project, &["commit", "-m", "Initial commit"])?;
    git(&project, &["tag", "1.0.0"])?;
    git(&project, &["push", "-u", "origin", "main", "--tags"])?;

    let fixture = Self {
      _root: root,
      root: path,
      project,
      updates,
      updates_remote,
      project_remote,
    };
    fixture.write_config(
      r#"channel = "1.20.1"
project_name = "Example Mod"
version_info_file = "../updates/version_info.json"
"#,
    )?;

    Ok(fixture)
  }

  /// Replace the project's promo.toml
  pub fn write_config(&self, content: &str) -> Result<()> {
    std::fs::write(self.project.join("promo.toml"), content)?;
    Ok(())
  }

  /// Add an empty commit to the project
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.project, &["commit", "--allow-empty", "-m", message])?;

    let output = git(&self.project, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Clone the version info remote into `name` (a second working copy)
  pub fn clone_updates(&self, name: &str) -> Result<PathBuf> {
    git(&self.root, &["clone", &self.updates_remote.to_string_lossy(), name])?;
    let clone = self.root.join(name);
    configure_user(&clone)?;
    Ok(clone)
  }

  /// Version info document as published on the remote
  pub fn published_version_info(&self) -> Result<serde_json::Value> {
    let output = git(&self.updates_remote, &["show", "main:version_info.json"])?;
    serde_json::from_slice(&output.stdout).context("Published version info is not JSON")
  }

  /// Number of commits on the version info remote
  pub fn published_commit_count(&self) -> Result<usize> {
    let output = git(&self.updates_remote, &["rev-list", "--count", "main"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().parse()?)
  }

  /// Subject of the newest commit on the version info remote
  pub fn published_subject(&self) -> Result<String> {
    let output = git(&self.updates_remote, &["log", "-1", "--format=%s", "main"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Tags on the project remote
  pub fn remote_tags(&self) -> Result<Vec<String>> {
    let output = git(&self.project_remote, &["tag", "-l"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Read a file relative to the project
  pub fn read_project_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.project.join(path))?)
  }
}

fn init_repo(path: &Path) -> Result<()> {
  git(path, &["init", "--initial-branch=main"])?;
  configure_user(path)
}

fn configure_user(path: &Path) -> Result<()> {
  git(path, &["config", "user.name", "Test User"])?;
  git(path, &["config", "user.email", "test@example.com"])?;
  git(path, &["config", "pull.rebase", "false"])?;
  Ok(())
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run release-promo without checking the exit status
pub fn run_release_promo_unchecked(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_release-promo");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run release-promo")
}

/// Run release-promo CLI command, failing on a non-zero exit
pub fn run_release_promo(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_release_promo_unchecked(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "release-promo command failed: release-promo {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
