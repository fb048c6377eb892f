//! Command-line surface
//!
//! Parsing lives here; [orchestration] owns the workflow so it can be driven
//! without clap.

pub mod orchestration;

use clap::{Parser, Subcommand};

use crate::error::{ReleaseError, Result};
use crate::release::Trigger;

#[derive(Debug, Parser)]
#[command(
    name = "pr-release",
    version,
    about = "Tag and publish a release from labeled, merged pull requests"
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(long, global = true, default_value = ".", help = "Path to the git repository")]
    pub repo: String,

    #[arg(
        long,
        global = true,
        default_value = "HEAD",
        help = "Revision to release (the tip of the release branch)"
    )]
    pub target: String,

    #[arg(
        long,
        global = true,
        help = "Decide the release without tagging, pushing or publishing"
    )]
    pub dry_run: bool,

    #[arg(short, long, global = true, help = "Show pipeline diagnostics")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Release everything merged since the last release tag
    Push,
    /// Release an explicit list of pull requests
    Manual {
        /// Comma-separated pull request numbers, e.g. "12,15,#18"
        #[arg(short, long)]
        pull_requests: String,
    },
}

impl Cli {
    /// Translate the subcommand into a pipeline trigger
    ///
    /// A manual list must name at least one pull request.
    pub fn trigger(&self) -> Result<Trigger> {
        match &self.command {
            Command::Push => Ok(Trigger::Push),
            Command::Manual { pull_requests } => match Trigger::manual(pull_requests)? {
                Trigger::Manual(numbers) if numbers.is_empty() => {
                    Err(ReleaseError::InvalidPullRequestList(
                        "no pull request numbers given".to_string(),
                    ))
                }
                trigger => Ok(trigger),
            },
        }
    }

    /// Default log filter when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
