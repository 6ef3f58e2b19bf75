//! System git backend
//!
//! Every operation is a single `git -C <dir> ...` subprocess. Output is scraped
//! from porcelain commands, so the environment is isolated and the
//! output-affecting config is pinned before any parsing happens.

use super::{Commit, VersionControl};
use crate::core::error::{GitError, PromoError, PromoResult};
use crate::utils::path_to_git_format;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// Environment variables passed through to git; everything else is cleared
const FORWARDED_ENV: &[&str] = &[
  "PATH",
  "HOME",
  "XDG_CONFIG_HOME",
  "USERPROFILE",
  "SYSTEMROOT",
  "SSH_AUTH_SOCK",
  "GIT_SSH_COMMAND",
  "GIT_ASKPASS",
  "GIT_AUTHOR_NAME",
  "GIT_AUTHOR_EMAIL",
  "GIT_COMMITTER_NAME",
  "GIT_COMMITTER_EMAIL",
];

/// Git backend using system git (zero crate dependencies)
#[derive(Debug, Clone)]
pub struct SystemGit {
  program: OsString,
}

impl SystemGit {
  pub fn new() -> Self {
    Self::with_program("git")
  }

  /// Use a specific git binary instead of the one on PATH
  pub fn with_program(program: impl Into<OsString>) -> Self {
    Self {
      program: program.into(),
    }
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Runs against `dir` via `-C`
  /// - Clears environment variables except [`FORWARDED_ENV`]
  /// - Pins config that changes porcelain output
  pub(crate) fn git_cmd(&self, dir: &Path) -> Command {
    let mut cmd = Command::new(&self.program);

    cmd.arg("-C").arg(dir);

    cmd.env_clear();
    for key in FORWARDED_ENV {
      if let Some(value) = std::env::var_os(key) {
        cmd.env(key, value);
      }
    }
    // Never block on a credential prompt
    cmd.env("GIT_TERMINAL_PROMPT", "0");

    cmd.arg("-c").arg("color.ui=false");
    cmd.arg("-c").arg("log.showSignature=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }

  /// Run a git subcommand and return its stdout, failing on non-zero exit
  pub(crate) fn run(&self, dir: &Path, args: &[&str]) -> PromoResult<String> {
    let output = self.output(dir, args)?;
    let command = describe(args);

    if !output.status.success() {
      return Err(PromoError::Git(GitError::CommandFailed {
        command,
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Spawn git and wait for it, without interpreting the exit status
  pub(crate) fn output(&self, dir: &Path, args: &[&str]) -> PromoResult<Output> {
    let command = describe(args);
    debug!(command = %command, dir = %dir.display(), "running git");

    self.git_cmd(dir).args(args).output().map_err(|e| {
      PromoError::Git(GitError::Launch {
        command,
        reason: e.to_string(),
      })
    })
  }
}

impl Default for SystemGit {
  fn default() -> Self {
    Self::new()
  }
}

impl VersionControl for SystemGit {
  fn last_tag(&self, dir: &Path) -> PromoResult<String> {
    let args = ["describe", "--tags", "--abbrev=0"];
    let output = self.output(dir, &args)?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("No names found") || stderr.contains("No tags can describe") {
        return Err(PromoError::Git(GitError::NoTags { dir: dir.to_path_buf() }));
      }
      return Err(PromoError::Git(GitError::CommandFailed {
        command: describe(&args),
        stderr: stderr.to_string(),
      }));
    }

    let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if tag.is_empty() {
      return Err(PromoError::Git(GitError::NoTags { dir: dir.to_path_buf() }));
    }
    Ok(tag)
  }

  fn commits_since(&self, tag: &str, dir: &Path) -> PromoResult<Vec<Commit>> {
    self.log_range(tag, dir)
  }

  fn pull(&self, dir: &Path) -> PromoResult<()> {
    self.run(dir, &["pull"]).map(drop)
  }

  fn add(&self, relative_path: &Path, dir: &Path) -> PromoResult<()> {
    let path = path_to_git_format(relative_path);
    self.run(dir, &["add", "--", &path]).map(drop)
  }

  fn commit(&self, message: &str, dir: &Path) -> PromoResult<()> {
    self.run(dir, &["commit", "-m", message]).map(drop)
  }

  fn push(&self, dir: &Path) -> PromoResult<()> {
    self.run(dir, &["push"]).map(drop)
  }

  fn create_tag(&self, name: &str, dir: &Path) -> PromoResult<()> {
    self.run(dir, &["tag", name]).map(drop)
  }

  fn push_tags(&self, dir: &Path) -> PromoResult<()> {
    self.run(dir, &["push", "--tags"]).map(drop)
  }
}

fn describe(args: &[&str]) -> String {
  format!("git {}", args.join(" "))
}
