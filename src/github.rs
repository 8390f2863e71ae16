use std::process::Command;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::debug;

use crate::types::{Forge, GraphQLPullRequest, GraphQLResponse, PullRequest};

pub fn get_github_token() -> Result<String> {
    // Prefer environment variables over gh CLI to avoid subprocess overhead.
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        return Ok(token);
    }

    if let Ok(token) = std::env::var("GH_TOKEN") {
        return Ok(token);
    }

    let output = Command::new("gh").args(["auth", "token"]).output()?;

    if !output.status.success() {
        anyhow::bail!("Failed to get GitHub token from gh CLI. Please run 'gh auth login' first");
    }

    let token = String::from_utf8(output.stdout)?.trim().to_string();

    if token.is_empty() {
        anyhow::bail!("Empty token returned from gh CLI");
    }

    Ok(token)
}

/// Creates an authenticated GitHub client using available credentials.
pub async fn setup_github_client() -> Result<Octocrab> {
    let token = get_github_token().context("Failed to obtain GitHub authentication token")?;
    Octocrab::builder()
        .personal_token(token)
        .build()
        .context("Failed to create GitHub client")
}

/// GitHub-backed [`Forge`] implementation speaking REST for release
/// lookups and GraphQL for the merged-PR search.
pub struct GitHub {
    octocrab: Octocrab,
}

impl GitHub {
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
    published_at: DateTime<Utc>,
}

fn create_graphql_query() -> serde_json::Value {
    serde_json::json!({
        "query": r#"
            query($query: String!, $after: String) {
                search(query: $query, type: ISSUE, first: 100, after: $after) {
                    nodes {
                        ... on PullRequest {
                            number
                            title
                            author {
                                login
                                __typename
                            }
                            repository {
                                nameWithOwner
                            }
                        }
                    }
                    pageInfo {
                        hasNextPage
                        endCursor
                    }
                }
            }
        "#,
        "variables": {}
    })
}

/// Flattens a GraphQL pull request node into the crate's projection.
fn convert_pull_request(node: GraphQLPullRequest) -> PullRequest {
    PullRequest {
        number: node.number,
        title: node.title,
        author_login: node
            .author
            .map(|author| author.display_format())
            .unwrap_or_else(|| "Unknown".to_string()),
        repo_name_with_owner: node.repository.name_with_owner,
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn latest_release_date(&self, owner: &str, name: &str) -> Result<String> {
        let release: LatestRelease = self
            .octocrab
            .get(format!("/repos/{owner}/{name}/releases/latest"), None::<&()>)
            .await
            .with_context(|| format!("failed to look up the latest release of {owner}/{name}"))?;

        Ok(release
            .published_at
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string())
    }

    async fn search_merged_pull_requests(&self, search_query: &str) -> Result<Vec<PullRequest>> {
        let mut all_prs = Vec::new();
        let mut after_cursor: Option<String> = None;
        let mut page_count = 0;

        loop {
            page_count += 1;
            let mut query = create_graphql_query();
            query["variables"]["query"] = serde_json::Value::String(search_query.to_string());
            query["variables"]["after"] = match &after_cursor {
                Some(cursor) => serde_json::Value::String(cursor.clone()),
                None => serde_json::Value::Null,
            };

            let response: GraphQLResponse = self
                .octocrab
                .graphql(&query)
                .await
                .context("GraphQL search for merged pull requests failed")?;
            let search_results = response.data.search;

            debug!(
                page = page_count,
                nodes = search_results.nodes.len(),
                "fetched search page"
            );

            all_prs.extend(search_results.nodes.into_iter().map(convert_pull_request));

            if !search_results.page_info.has_next_page {
                break;
            }

            // The server said there are more pages; without a cursor we
            // cannot request them.
            after_cursor = search_results.page_info.end_cursor;
            if after_cursor.is_none() {
                break;
            }
        }

        Ok(all_prs)
    }
}
