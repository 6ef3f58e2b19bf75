//! Release publishing
//!
//! A release run turns git history into a changelog, records it in the
//! update-checker version info document and moves the repository forward.
//!
//! # Invariants
//!
//! 1. **The changelog range ends at the previous tag**
//!    - The last tag is read before the run creates the new one
//!
//! 2. **Every promotion points at a recorded release**
//!    - `promos` values are only ever set together with the changelog entry
//!      they reference
//!
//! 3. **The document is rewritten, never patched**
//!    - Pulled, decoded, merged in memory once, encoded canonically, pushed
//!    - Prior entries and their order survive the round trip
//!
//! # Modules
//!
//! - **history**: commits since the last tag, exclude-marker filtering
//! - **changelog**: `- <message> [<author>]` rendering
//! - **version_info**: document model and promotion semantics
//! - **codec**: JSON decode/encode
//! - **orchestrator**: the run itself, including debug mode

pub mod changelog;
pub mod codec;
pub mod history;
pub mod orchestrator;
pub mod version_info;
