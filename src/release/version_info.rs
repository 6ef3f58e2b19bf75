//! In-memory model of the update-checker version info document
//!
//! ```json
//! {
//!   "homepage": "https://example.com/",
//!   "1.20.1": { "1.20.1-1.0.0": "Initial release" },
//!   "promos": { "1.20.1-latest": "1.20.1-1.0.0", "1.20.1-recommended": "1.20.1-1.0.0" }
//! }
//! ```
//!
//! Channels and the ids inside them keep insertion order so a load → mutate →
//! save cycle produces a minimal diff.

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

const LATEST_SUFFIX: &str = "-latest";
const RECOMMENDED_SUFFIX: &str = "-recommended";

/// Which promotion keys a new release updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
  /// `<channel>-latest` only
  Latest,
  /// `<channel>-latest` and `<channel>-recommended`
  Recommended,
}

impl Promotion {
  pub fn from_recommended(recommended: bool) -> Self {
    if recommended { Self::Recommended } else { Self::Latest }
  }
}

/// Channel -> release id -> changelog text
pub type Changelogs = IndexMap<String, IndexMap<String, String>>;

/// Promotion key -> release id
pub type Promos = IndexMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct VersionInfo {
  pub homepage: String,
  pub changelogs: Changelogs,
  pub promos: Promos,
}

/// `<channel>-<version>`
pub fn release_id(channel: &str, version: &str) -> String {
  format!("{}-{}", channel, version)
}

pub fn latest_key(channel: &str) -> String {
  format!("{}{}", channel, LATEST_SUFFIX)
}

pub fn recommended_key(channel: &str) -> String {
  format!("{}{}", channel, RECOMMENDED_SUFFIX)
}

impl VersionInfo {
  #[cfg(test)]
  pub fn new(homepage: impl Into<String>) -> Self {
    Self {
      homepage: homepage.into(),
      ..Self::default()
    }
  }

  /// Record a release and promote it to latest
  pub fn add_latest_version(&mut self, channel: &str, release_id: &str, changelog: &str) {
    self.add_changelog(channel, release_id, changelog);
    self.promos.insert(latest_key(channel), release_id.to_string());
  }

  /// Record a release and promote it to both latest and recommended
  pub fn add_recommended_version(&mut self, channel: &str, release_id: &str, changelog: &str) {
    self.add_latest_version(channel, release_id, changelog);
    self.promos.insert(recommended_key(channel), release_id.to_string());
  }

  pub fn add_version(&mut self, promotion: Promotion, channel: &str, release_id: &str, changelog: &str) {
    match promotion {
      Promotion::Latest => self.add_latest_version(channel, release_id, changelog),
      Promotion::Recommended => self.add_recommended_version(channel, release_id, changelog),
    }
  }

  // Overwriting an existing id keeps its position in the channel
  fn add_changelog(&mut self, channel: &str, release_id: &str, changelog: &str) {
    self
      .changelogs
      .entry(channel.to_string())
      .or_default()
      .insert(release_id.to_string(), changelog.to_string());
  }

  #[cfg(test)]
  pub fn changelog(&self, channel: &str, release_id: &str) -> Option<&str> {
    self
      .changelogs
      .get(channel)
      .and_then(|entries| entries.get(release_id))
      .map(String::as_str)
  }

  pub fn promo(&self, key: &str) -> Option<&str> {
    self.promos.get(key).map(String::as_str)
  }

  pub fn latest(&self, channel: &str) -> Option<&str> {
    self.promo(&latest_key(channel))
  }

  pub fn recommended(&self, channel: &str) -> Option<&str> {
    self.promo(&recommended_key(channel))
  }

  pub fn channels(&self) -> impl Iterator<Item = &str> {
    self.changelogs.keys().map(String::as_str)
  }

  /// Number of releases recorded for a channel
  pub fn release_count(&self, channel: &str) -> usize {
    self.changelogs.get(channel).map_or(0, IndexMap::len)
  }
}

// Structural, order-insensitive: reordering keys in the file is not a change
impl PartialEq for VersionInfo {
  fn eq(&self, other: &Self) -> bool {
    self.homepage == other.homepage && self.changelogs == other.changelogs && self.promos == other.promos
  }
}

impl Eq for VersionInfo {}

impl Hash for VersionInfo {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.homepage.hash(state);
    let changelogs: BTreeMap<_, BTreeMap<_, _>> = self
      .changelogs
      .iter()
      .map(|(channel, entries)| (channel, entries.iter().collect()))
      .collect();
    changelogs.hash(state);
    let promos: BTreeMap<_, _> = self.promos.iter().collect();
    promos.hash(state);
  }
}
