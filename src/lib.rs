//! gh-changelog: changelog generation from merged GitHub pull requests.
//!
//! Queries a repository's (or a whole organization's) merged pull
//! requests since a reference date via GitHub's GraphQL search API,
//! classifies each one by its conventional-commit title prefix, and
//! renders the result either as plain text lines or as a Markdown
//! document with one section per category.

pub mod changelog;
pub mod cli;
pub mod git;
pub mod github;
pub mod query;
pub mod types;

pub use changelog::{render_markdown, render_plain};
pub use cli::Cli;
pub use github::{GitHub, setup_github_client};
pub use query::{build_changelog, build_search_query, resolve_since};
pub use types::{
    ChangelogRequest, Forge, OutputMode, PrCategory, PullRequest, Repo, RepoError,
};
