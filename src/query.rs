use anyhow::Result;
use tracing::debug;

use crate::{
    changelog::{render_markdown, render_plain},
    types::{ChangelogRequest, Forge, OutputMode, Repo},
};

/// Resolves the start of the changelog window.
///
/// An explicit `--since` wins; otherwise the publish date of the
/// target repository's latest release is used. A bare organization has
/// no release to anchor on, so it requires an explicit date.
pub async fn resolve_since<F>(forge: &F, repo: &Repo, since: Option<&str>) -> Result<String>
where
    F: Forge + Sync,
{
    if let Some(since) = since {
        return Ok(since.to_string());
    }

    match &repo.name {
        Some(name) => forge.latest_release_date(&repo.owner, name).await,
        None => anyhow::bail!(
            "cannot determine start date: provide --since or select a single repository"
        ),
    }
}

/// `merged:` qualifier covering the requested timespan.
fn timespan_search_term(since: &str, until: Option<&str>) -> String {
    match until {
        Some(until) => format!("{since}..{until}"),
        None => format!(">={since}"),
    }
}

/// Full search query selecting merged PRs for the target and timespan.
pub fn build_search_query(repo: &Repo, since: &str, until: Option<&str>) -> String {
    format!(
        "{} is:merged merged:{}",
        repo.search_term(),
        timespan_search_term(since, until)
    )
}

/// Fetches the merged pull requests covered by the request and renders
/// the changelog in the requested mode.
pub async fn build_changelog<F>(request: &ChangelogRequest, forge: &F) -> Result<String>
where
    F: Forge + Sync,
{
    let since = resolve_since(forge, &request.repo, request.since.as_deref()).await?;
    let search_query = build_search_query(&request.repo, &since, request.until.as_deref());
    debug!(%search_query, "searching for merged pull requests");

    let prs = forge.search_merged_pull_requests(&search_query).await?;
    debug!(count = prs.len(), "merged pull requests fetched");

    Ok(match request.mode {
        OutputMode::Plain => render_plain(&prs),
        OutputMode::Pretty => render_markdown(&prs),
    })
}
