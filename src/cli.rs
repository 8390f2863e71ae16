use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::{
    git,
    types::{ChangelogRequest, OutputMode, Repo},
};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

const CHANGELOG_EXAMPLES: &str = "\
Examples:
  gh-changelog changelog --repo acme/widgets
      Changelog of acme/widgets since its latest published release
  gh-changelog changelog --repo acme --since 2025-12-01 --pretty
      Markdown changelog for every acme repository since 1 Dec 2025";

#[derive(Parser, Debug)]
#[command(name = "gh-changelog")]
#[command(about = "Render a changelog from merged GitHub pull requests")]
#[command(long_version = BUILD_INFO_HUMAN)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the changelog of PRs merged since the last published release
    #[command(after_help = CHANGELOG_EXAMPLES)]
    Changelog(ChangelogArgs),

    /// Print the toplevel directory of the current checkout
    Workspace,
}

#[derive(Args, Debug, Default)]
pub struct ChangelogArgs {
    /// Start the changelog at date SINCE (ISO 8601)
    #[arg(long, value_name = "SINCE")]
    pub since: Option<String>,

    /// End the changelog at date UNTIL (ISO 8601)
    #[arg(long, value_name = "UNTIL")]
    pub until: Option<String>,

    /// Select another repository or organization using the OWNER[/REPO] format
    #[arg(short = 'R', long, value_name = "OWNER[/REPO]")]
    pub repo: Option<String>,

    /// Pretty-print the changelog as markdown
    #[arg(long)]
    pub pretty: bool,
}

impl ChangelogArgs {
    /// Resolves the raw arguments into a fully specified request,
    /// falling back to the current checkout's origin remote when no
    /// repository selector was given.
    pub fn into_request(self) -> Result<ChangelogRequest> {
        let repo = match self.repo.as_deref() {
            Some(selector) => Repo::parse(selector)?,
            None => git::current_repository()
                .context("no repository selected and none found in the current checkout; use --repo")?,
        };

        let mode = if self.pretty {
            OutputMode::Pretty
        } else {
            OutputMode::Plain
        };

        Ok(ChangelogRequest {
            repo,
            since: self.since,
            until: self.until,
            mode,
        })
    }
}
