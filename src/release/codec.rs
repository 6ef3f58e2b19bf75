//! JSON encoding of the version info document
//!
//! Encoding is canonical: two-space pretty printing, `homepage` first, channels
//! in insertion order, `promos` last, no trailing newline. The file is edited
//! and diffed by hand, so `encode(decode(text)) == text` must hold for any file
//! already in that shape.

use super::version_info::VersionInfo;
use crate::core::error::{DocumentError, PromoError, PromoResult};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

const HOMEPAGE: &str = "homepage";
const PROMOS: &str = "promos";

/// Top-level keys that are not channels
pub const RESERVED_KEYS: [&str; 2] = [HOMEPAGE, PROMOS];

impl Serialize for VersionInfo {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let mut map = serializer.serialize_map(Some(self.changelogs.len() + 2))?;
    map.serialize_entry(HOMEPAGE, &self.homepage)?;
    for (channel, entries) in &self.changelogs {
      map.serialize_entry(channel, entries)?;
    }
    map.serialize_entry(PROMOS, &self.promos)?;
    map.end()
  }
}

/// Parse a version info document
///
/// Any top-level key other than `homepage` and `promos` is a channel. Every
/// channel and `promos` must be an object of strings.
pub fn decode(text: &str) -> Result<VersionInfo, DocumentError> {
  let root: Value = serde_json::from_str(text).map_err(|e| DocumentError::Parse { reason: e.to_string() })?;
  let Value::Object(root) = root else {
    return Err(DocumentError::NotAnObject { key: None });
  };

  let mut info = VersionInfo::default();
  for (key, value) in root {
    match key.as_str() {
      HOMEPAGE => {
        info.homepage = match value {
          Value::String(homepage) => homepage,
          _ => return Err(DocumentError::NotAString { key }),
        }
      }
      PROMOS => info.promos = string_map(&key, value)?,
      _ => {
        let entries = string_map(&key, value)?;
        info.changelogs.insert(key, entries);
      }
    }
  }

  Ok(info)
}

/// Canonical text of a version info document
pub fn encode(info: &VersionInfo) -> PromoResult<String> {
  serde_json::to_string_pretty(info).map_err(PromoError::from)
}

/// Read and decode a version info file; the file must exist
pub fn read(path: &Path) -> PromoResult<VersionInfo> {
  let text = match fs::read_to_string(path) {
    Ok(text) => text,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(DocumentError::Missing {
        path: path.to_path_buf(),
      }
      .into());
    }
    Err(e) => return Err(PromoError::Io(e).context(format!("Failed to read {}", path.display()))),
  };

  Ok(decode(&text)?)
}

/// Encode and overwrite a version info file
pub fn write(path: &Path, info: &VersionInfo) -> PromoResult<()> {
  let text = encode(info)?;
  fs::write(path, text).map_err(|source| PromoError::Write {
    path: path.to_path_buf(),
    source,
  })
}

fn string_map(key: &str, value: Value) -> Result<IndexMap<String, String>, DocumentError> {
  let Value::Object(map) = value else {
    return Err(DocumentError::NotAnObject {
      key: Some(key.to_string()),
    });
  };

  map
    .into_iter()
    .map(|(name, value)| match value {
      Value::String(text) => Ok((name, text)),
      _ => Err(DocumentError::NotAString {
        key: format!("{}.{}", key, name),
      }),
    })
    .collect()
}
