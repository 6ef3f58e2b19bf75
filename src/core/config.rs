//! promo.toml loading and resolution into release settings

use crate::core::error::{ConfigError, PromoError, PromoResult, ResultExt};
use crate::core::vcs::SystemGit;
use crate::release::codec::RESERVED_KEYS;
use crate::release::history::DEFAULT_EXCLUDE_MARKER;
use crate::release::version_info::Promotion;
use crate::utils::{dir_name, resolve_against};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the changelog lands when nothing else is configured
pub const DEFAULT_CHANGELOG_OUTPUT_FILE: &str = "build/changelog.txt";

/// Configuration for release-promo
/// Searched in order: promo.toml, .promo.toml, .config/promo.toml
///
/// Every key is optional here; CLI flags override the file and required
/// settings are checked when resolving [`ReleaseSettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromoConfig {
  /// Release channel, e.g. the target game/runtime version
  pub channel: Option<String>,

  /// Name used in the version info commit message (default: project directory name)
  pub project_name: Option<String>,

  /// Promote new releases to recommended as well as latest (default: true)
  pub recommended: Option<bool>,

  /// Version info document to update; unset skips the document entirely
  pub version_info_file: Option<PathBuf>,

  /// Changelog output (default: build/changelog.txt)
  pub changelog_output_file: Option<PathBuf>,

  /// Commits starting with this are left out of the changelog (default: "[exclc]", "" disables)
  pub exclude_marker: Option<String>,

  /// Prepended to the new version to form the tag name (default: none)
  pub tag_prefix: Option<String>,

  /// Git binary (default: git on PATH)
  pub git_program: Option<String>,
}

/// Values given on the command line, applied on top of [`PromoConfig`]
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub channel: Option<String>,
  pub project_name: Option<String>,
  pub recommended: Option<bool>,
  pub version_info_file: Option<PathBuf>,
  pub changelog_output_file: Option<PathBuf>,
  pub exclude_marker: Option<String>,
  pub tag_prefix: Option<String>,
}

/// Everything a release run needs, fully resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSettings {
  /// Repository the changelog is read from and the tag is created in
  pub project_dir: PathBuf,
  pub project_name: String,
  pub channel: String,
  pub new_version: String,
  pub promotion: Promotion,
  pub version_info_file: Option<PathBuf>,
  pub changelog_output_file: PathBuf,
  pub exclude_marker: Option<String>,
  pub tag_prefix: String,
  /// Compute and report everything, mutate nothing
  pub debug: bool,
}

impl ReleaseSettings {
  /// `<channel>-<new_version>`
  pub fn release_id(&self) -> String {
    crate::release::version_info::release_id(&self.channel, &self.new_version)
  }

  pub fn tag_name(&self) -> String {
    format!("{}{}", self.tag_prefix, self.new_version)
  }

  pub fn commit_message(&self) -> String {
    format!("Update version info for {}", self.project_name)
  }
}

impl PromoConfig {
  /// Find config file in search order: promo.toml, .promo.toml, .config/promo.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("promo.toml"),
      path.join(".promo.toml"),
      path.join(".config").join("promo.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the project directory; no config file means all defaults
  pub fn load(path: &Path) -> PromoResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    Self::parse(&content, &config_path)
  }

  pub fn parse(content: &str, config_path: &Path) -> PromoResult<Self> {
    toml_edit::de::from_str(content).map_err(|e| {
      PromoError::Config(ConfigError::Parse {
        path: config_path.to_path_buf(),
        reason: e.to_string(),
      })
    })
  }

  /// Apply command-line overrides; a set override always wins
  pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
    Self {
      channel: overrides.channel.or(self.channel),
      project_name: overrides.project_name.or(self.project_name),
      recommended: overrides.recommended.or(self.recommended),
      version_info_file: overrides.version_info_file.or(self.version_info_file),
      changelog_output_file: overrides.changelog_output_file.or(self.changelog_output_file),
      exclude_marker: overrides.exclude_marker.or(self.exclude_marker),
      tag_prefix: overrides.tag_prefix.or(self.tag_prefix),
      git_program: self.git_program,
    }
  }

  /// Exclude marker with the default applied; `""` disables filtering
  pub fn exclude_marker(&self) -> Option<String> {
    let marker = self.exclude_marker.as_deref().unwrap_or(DEFAULT_EXCLUDE_MARKER);
    (!marker.is_empty()).then(|| marker.to_string())
  }

  pub fn version_info_path(&self, project_dir: &Path) -> Option<PathBuf> {
    self
      .version_info_file
      .as_ref()
      .map(|file| resolve_against(project_dir, file))
  }

  pub fn git(&self) -> SystemGit {
    match &self.git_program {
      Some(program) => SystemGit::with_program(program),
      None => SystemGit::new(),
    }
  }

  /// Resolve into settings for a release run, validating required values
  pub fn into_settings(self, project_dir: &Path, new_version: Option<String>, debug: bool) -> PromoResult<ReleaseSettings> {
    let channel = require("channel", self.channel.clone())?;
    validate_token("channel", &channel)?;
    if RESERVED_KEYS.contains(&channel.as_str()) {
      return Err(PromoError::Config(ConfigError::InvalidField {
        field: "channel".to_string(),
        reason: format!("'{}' is a reserved key in the version info file", channel),
      }));
    }

    let new_version = require("new_version", new_version)?;
    validate_token("new_version", &new_version)?;

    let tag_prefix = self.tag_prefix.clone().unwrap_or_default();
    if tag_prefix.chars().any(char::is_whitespace) {
      return Err(PromoError::Config(ConfigError::InvalidField {
        field: "tag_prefix".to_string(),
        reason: "must not contain whitespace".to_string(),
      }));
    }

    let project_name = match self.project_name.clone().filter(|name| !name.trim().is_empty()) {
      Some(name) => name,
      None => default_project_name(project_dir).ok_or_else(|| ConfigError::MissingField {
        field: "project_name".to_string(),
      })?,
    };

    let changelog_output_file = resolve_against(
      project_dir,
      self
        .changelog_output_file
        .as_deref()
        .unwrap_or(Path::new(DEFAULT_CHANGELOG_OUTPUT_FILE)),
    );

    Ok(ReleaseSettings {
      project_dir: project_dir.to_path_buf(),
      project_name,
      channel,
      new_version,
      promotion: Promotion::from_recommended(self.recommended.unwrap_or(true)),
      version_info_file: self.version_info_path(project_dir),
      changelog_output_file,
      exclude_marker: self.exclude_marker(),
      tag_prefix,
      debug,
    })
  }
}

// `.` and `..` have no name of their own until resolved
fn default_project_name(project_dir: &Path) -> Option<String> {
  dir_name(project_dir).or_else(|| fs::canonicalize(project_dir).ok().as_deref().and_then(dir_name))
}

fn require(field: &str, value: Option<String>) -> PromoResult<String> {
  value
    .filter(|v| !v.trim().is_empty())
    .ok_or_else(|| {
      PromoError::Config(ConfigError::MissingField {
        field: field.to_string(),
      })
    })
}

// Channel and version end up in JSON keys, promo keys and tag names
fn validate_token(field: &str, value: &str) -> PromoResult<()> {
  if value.chars().any(char::is_whitespace) {
    return Err(PromoError::Config(ConfigError::InvalidField {
      field: field.to_string(),
      reason: format!("'{}' must not contain whitespace", value),
    }));
  }
  Ok(())
}
