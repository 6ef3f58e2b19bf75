//! Plain-text changelog rendering
//!
//! One bullet per commit, `- <message> [<author>]`, in the order the history
//! was read. No trailing newline; an empty history renders as an empty string.

use crate::core::vcs::Commit;

/// Render a single changelog line
pub fn render_line(commit: &Commit) -> String {
  format!("- {} [{}]", commit.message, commit.author_name)
}

/// Render commits as changelog text
pub fn render(commits: &[Commit]) -> String {
  commits.iter().map(render_line).collect::<Vec<_>>().join("\n")
}
