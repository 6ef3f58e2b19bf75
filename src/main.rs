mod commands;
mod core;
mod release;
mod utils;

use clap::{Args, Parser, Subcommand};
use core::config::ConfigOverrides;
use core::error::{PromoError, ResultExt, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Publish releases: changelog from git history, update-checker JSON, release tag
#[derive(Parser)]
#[command(name = "release-promo")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Project directory (defaults to the current directory)
  #[arg(short = 'C', long, global = true, value_name = "DIR")]
  project_dir: Option<PathBuf>,

  /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Publish a release: write the changelog, update the version info file, tag
  Release(ReleaseCli),

  /// Preview the changelog since the last tag
  Changelog {
    /// Start from this ref instead of the most recent tag
    #[arg(long, value_name = "REF")]
    since: Option<String>,
    /// Override the exclude marker ("" disables filtering)
    #[arg(long)]
    exclude_marker: Option<String>,
    /// Output commits in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show the promotions recorded in the version info file
  Status {
    /// Only show this channel
    #[arg(long)]
    channel: Option<String>,
    /// Version info file (overrides promo.toml)
    #[arg(long, value_name = "FILE")]
    version_info_file: Option<PathBuf>,
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
  },
}

#[derive(Args)]
struct ReleaseCli {
  /// Version being released (e.g. 1.0.1)
  #[arg(long, value_name = "VERSION")]
  new_version: Option<String>,
  /// Release channel, usually the platform version (e.g. 1.20.1)
  #[arg(long)]
  channel: Option<String>,
  /// Promote to both latest and recommended (default)
  #[arg(long, conflicts_with = "latest_only")]
  recommended: bool,
  /// Promote to latest only
  #[arg(long)]
  latest_only: bool,
  /// Version info JSON file inside a git working copy
  #[arg(long, value_name = "FILE")]
  version_info_file: Option<PathBuf>,
  /// Where to write the changelog text
  #[arg(long = "changelog-output", value_name = "FILE")]
  changelog_output_file: Option<PathBuf>,
  /// Commits whose message starts with this marker are left out ("" disables)
  #[arg(long)]
  exclude_marker: Option<String>,
  /// Project name used in the version info commit message
  #[arg(long)]
  project_name: Option<String>,
  /// Prefix prepended to the version for the release tag
  #[arg(long)]
  tag_prefix: Option<String>,
  /// Print what would be written and committed, change nothing
  #[arg(long)]
  debug: bool,
}

impl ReleaseCli {
  fn into_args(self) -> commands::ReleaseArgs {
    let recommended = match (self.recommended, self.latest_only) {
      (true, _) => Some(true),
      (_, true) => Some(false),
      _ => None,
    };

    commands::ReleaseArgs {
      new_version: self.new_version,
      overrides: ConfigOverrides {
        channel: self.channel,
        project_name: self.project_name,
        recommended,
        version_info_file: self.version_info_file,
        changelog_output_file: self.changelog_output_file,
        exclude_marker: self.exclude_marker,
        tag_prefix: self.tag_prefix,
      },
      debug: self.debug,
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let project_dir = match cli.project_dir {
    Some(dir) => dir,
    None => std::env::current_dir()
      .context("Failed to get current directory")
      .unwrap_or_else(|e| handle_error(e)),
  };

  let result = match cli.command {
    Commands::Release(release) => commands::run_release(&project_dir, release.into_args()),
    Commands::Changelog {
      since,
      exclude_marker,
      json,
    } => commands::run_changelog(&project_dir, since, exclude_marker, json),
    Commands::Status {
      channel,
      version_info_file,
      json,
    } => commands::run_status(&project_dir, version_info_file, channel, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  // stdout carries command output
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

fn handle_error(err: PromoError) -> ! {
  if let Some(stage) = err.stage() {
    tracing::debug!(stage = %stage, "release aborted");
  }
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
