//! Core building blocks shared by every command
//!
//! - **config**: promo.toml discovery, CLI overrides, resolved release settings
//! - **error**: error types with exit codes and contextual help messages
//! - **vcs**: git operations behind the `VersionControl` trait (SystemGit)

pub mod config;
pub mod error;
pub mod vcs;
