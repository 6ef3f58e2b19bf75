//! CLI commands for release-promo
//!
//! - **release**: publish a release (changelog, version info, tag)
//! - **changelog**: preview the changelog since the last tag
//! - **status**: show the promotions recorded in the version info file
//!
//! Every command takes the project directory resolved in main.rs.

pub mod changelog;
pub mod release;
pub mod status;

pub use changelog::run_changelog;
pub use release::{ReleaseArgs, run_release};
pub use status::run_status;
