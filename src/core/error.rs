//! Error types for release-promo with contextual messages and exit codes
//!
//! Every failure of a release run surfaces as a [`PromoError`]. Nothing is
//! retried or recovered locally: the run stops at the first error and the
//! process exits with the error's [`ExitCode`].

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for release-promo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args)
  User = 1,
  /// System error (git, file system)
  System = 2,
  /// The version info document is missing or malformed
  Document = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Stage of a release run, attached to errors so the user knows where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  BuildChangelog,
  SyncVersionInfo,
  ReadVersionInfo,
  WriteVersionInfo,
  PublishVersionInfo,
  WriteChangelog,
  TagRelease,
}

impl Stage {
  pub fn describe(self) -> &'static str {
    match self {
      Stage::BuildChangelog => "building the changelog",
      Stage::SyncVersionInfo => "pulling the version info repository",
      Stage::ReadVersionInfo => "reading the version info file",
      Stage::WriteVersionInfo => "writing the version info file",
      Stage::PublishVersionInfo => "committing and pushing the version info file",
      Stage::WriteChangelog => "writing the changelog output",
      Stage::TagRelease => "tagging the release",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.describe())
  }
}

/// Main error type for release-promo
#[derive(Debug)]
pub enum PromoError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Version info document errors
  Document(DocumentError),

  /// Writing an output file failed
  Write { path: PathBuf, source: io::Error },

  /// I/O errors
  Io(io::Error),

  /// A release stage failed
  Stage { stage: Stage, source: Box<PromoError> },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PromoError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PromoError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Wrap this error with the release stage it happened in
  pub fn in_stage(self, stage: Stage) -> Self {
    PromoError::Stage {
      stage,
      source: Box::new(self),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PromoError::Message { message, context, help } => PromoError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      PromoError::Io(e) => PromoError::Message {
        message: format!("{}: {}", ctx_str, e),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      PromoError::Config(_) => ExitCode::User,
      PromoError::Git(_) => ExitCode::System,
      PromoError::Document(_) => ExitCode::Document,
      PromoError::Write { .. } => ExitCode::System,
      PromoError::Io(_) => ExitCode::System,
      PromoError::Stage { source, .. } => source.exit_code(),
      PromoError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PromoError::Config(e) => e.help_message(),
      PromoError::Git(e) => e.help_message(),
      PromoError::Document(e) => e.help_message(),
      PromoError::Stage { source, .. } => source.help_message(),
      PromoError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }

  /// The stage a run failed in, if known
  pub fn stage(&self) -> Option<Stage> {
    match self {
      PromoError::Stage { stage, .. } => Some(*stage),
      _ => None,
    }
  }
}

impl fmt::Display for PromoError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PromoError::Config(e) => write!(f, "{}", e),
      PromoError::Git(e) => write!(f, "{}", e),
      PromoError::Document(e) => write!(f, "{}", e),
      PromoError::Write { path, source } => write!(f, "Failed to write {}: {}", path.display(), source),
      PromoError::Io(e) => write!(f, "I/O error: {}", e),
      PromoError::Stage { stage, source } => write!(f, "Failed while {}: {}", stage, source),
      PromoError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PromoError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PromoError::Io(e) => Some(e),
      PromoError::Write { source, .. } => Some(source),
      PromoError::Stage { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for PromoError {
  fn from(err: io::Error) -> Self {
    PromoError::Io(err)
  }
}

impl From<String> for PromoError {
  fn from(msg: String) -> Self {
    PromoError::message(msg)
  }
}

impl From<&str> for PromoError {
  fn from(msg: &str) -> Self {
    PromoError::message(msg)
  }
}

impl From<GitError> for PromoError {
  fn from(err: GitError) -> Self {
    PromoError::Git(err)
  }
}

impl From<DocumentError> for PromoError {
  fn from(err: DocumentError) -> Self {
    PromoError::Document(err)
  }
}

impl From<ConfigError> for PromoError {
  fn from(err: ConfigError) -> Self {
    PromoError::Config(err)
  }
}

impl From<serde_json::Error> for PromoError {
  fn from(err: serde_json::Error) -> Self {
    PromoError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// promo.toml exists but could not be parsed
  Parse { path: PathBuf, reason: String },

  /// Missing required field
  MissingField { field: String },

  /// Field present but unusable
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingField { field } => Some(format!(
        "Set `{}` in promo.toml or pass --{} on the command line.",
        field,
        field.replace('_', "-")
      )),
      ConfigError::Parse { .. } => Some("Check promo.toml for TOML syntax errors and unknown keys.".to_string()),
      ConfigError::InvalidField { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Parse { path, reason } => {
        write!(f, "Failed to parse config {}: {}", path.display(), reason)
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required setting: {}", field)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid setting '{}': {}", field, reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command exited non-zero
  CommandFailed { command: String, stderr: String },

  /// Git could not be launched at all
  Launch { command: String, reason: String },

  /// No tag reachable from HEAD
  NoTags { dir: PathBuf },

  /// Git output did not have the expected shape
  UnexpectedOutput { command: String, detail: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::NoTags { .. } => {
        Some("Tag the previous release first (e.g. `git tag 1.0.0`); the changelog starts from the last tag.".to_string())
      }
      GitError::Launch { .. } => Some("Make sure git is installed and on PATH.".to_string()),
      GitError::CommandFailed { command, stderr } => {
        if command.contains("push") && (stderr.contains("non-fast-forward") || stderr.contains("rejected")) {
          Some("The remote has commits you don't have. Pull and run the release again.".to_string())
        } else if stderr.contains("no upstream") || stderr.contains("no tracking information") {
          Some("Configure an upstream branch for the repository (git push -u <remote> <branch>).".to_string())
        } else {
          None
        }
      }
      GitError::UnexpectedOutput { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr.trim_end())
      }
      GitError::Launch { command, reason } => {
        write!(f, "Failed to run {}: {}", command, reason)
      }
      GitError::NoTags { dir } => {
        write!(f, "No tags found in repository at {}", dir.display())
      }
      GitError::UnexpectedOutput { command, detail } => {
        write!(f, "Unexpected output from {}: {}", command, detail)
      }
    }
  }
}

/// Version info document errors
#[derive(Debug)]
pub enum DocumentError {
  /// The file does not exist
  Missing { path: PathBuf },

  /// Not valid JSON
  Parse { reason: String },

  /// Root (`key == None`) or a nested value is not an object
  NotAnObject { key: Option<String> },

  /// An entry inside an object is not a string
  NotAString { key: String },
}

impl DocumentError {
  fn help_message(&self) -> Option<String> {
    match self {
      DocumentError::Missing { .. } => Some(
        "Create the file first, e.g. {\"homepage\": \"https://example.com/\", \"promos\": {}}".to_string(),
      ),
      _ => None,
    }
  }
}

impl fmt::Display for DocumentError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DocumentError::Missing { path } => {
        write!(f, "Version info file not found: {}", path.display())
      }
      DocumentError::Parse { reason } => {
        write!(f, "Version info JSON invalid: {}", reason)
      }
      DocumentError::NotAnObject { key: None } => {
        write!(f, "Version info JSON invalid: root element must be an object")
      }
      DocumentError::NotAnObject { key: Some(key) } => {
        write!(f, "Version info JSON invalid: \"{}\" property must be an object", key)
      }
      DocumentError::NotAString { key } => {
        write!(f, "Version info JSON invalid: \"{}\" must be a string", key)
      }
    }
  }
}

/// Result type alias for release-promo
pub type PromoResult<T> = Result<T, PromoError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PromoResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PromoResult<T>
  where
    F: FnOnce() -> String;

  /// Tag the error with the release stage it happened in
  fn stage(self, stage: Stage) -> PromoResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PromoError>,
{
  fn context(self, ctx: impl Into<String>) -> PromoResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PromoResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }

  fn stage(self, stage: Stage) -> PromoResult<T> {
    self.map_err(|e| e.into().in_stage(stage))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PromoError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
