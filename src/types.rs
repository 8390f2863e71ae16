use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

/// Target of a changelog query: a single repository, or every
/// repository of an organization when `name` is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub owner: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    InvalidSelector(String),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::InvalidSelector(selector) => write!(
                f,
                "invalid repository selector '{selector}': must be of format OWNER[/REPO]"
            ),
        }
    }
}

impl std::error::Error for RepoError {}

fn selector_regex() -> &'static Regex {
    static SELECTOR: OnceLock<Regex> = OnceLock::new();
    SELECTOR.get_or_init(|| Regex::new(r"^([\w-]+)(?:/([\w-]+))?$").unwrap())
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: Option<String>) -> Self {
        Self {
            owner: owner.into(),
            name,
        }
    }

    /// Parses an `OWNER[/REPO]` selector.
    pub fn parse(selector: &str) -> Result<Self, RepoError> {
        let captures = selector_regex()
            .captures(selector)
            .ok_or_else(|| RepoError::InvalidSelector(selector.to_string()))?;

        Ok(Self {
            owner: captures[1].to_string(),
            name: captures.get(2).map(|name| name.as_str().to_string()),
        })
    }

    /// Search term selecting this target in a GitHub search query.
    pub fn search_term(&self) -> String {
        match &self.name {
            Some(name) => format!("repo:{}/{}", self.owner, name),
            None => format!("org:{}", self.owner),
        }
    }
}

impl std::fmt::Display for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}/{}", self.owner, name),
            None => write!(f, "{}", self.owner),
        }
    }
}

/// Change categories for the pretty changelog, derived from
/// conventional-commit style title prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrCategory {
    General,
    Features,
    BugFixes,
    Maintenance,
    Documentation,
    Logistics,
    Performance,
    Tests,
}

// A keyword only classifies a title when it is followed by an optional
// (scope) or [scope] and a ':' separator; "feature X is broken" stays
// uncategorized.
fn title_prefix_regex() -> &'static Regex {
    static TITLE_PREFIX: OnceLock<Regex> = OnceLock::new();
    TITLE_PREFIX.get_or_init(|| Regex::new(r"^([a-z]+)(?:\([^)]*\)|\[[^\]]*\])?:").unwrap())
}

impl PrCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PrCategory::General => "GENERAL",
            PrCategory::Features => "FEATURES",
            PrCategory::BugFixes => "BUG_FIXES",
            PrCategory::Maintenance => "MAINTENANCE",
            PrCategory::Documentation => "DOCUMENTATION",
            PrCategory::Logistics => "LOGISTICS",
            PrCategory::Performance => "PERFORMANCE",
            PrCategory::Tests => "TESTS",
        }
    }

    /// Emoji-decorated section heading for markdown output.
    pub fn pretty(&self) -> &'static str {
        match self {
            PrCategory::General => "🧩 Other Changes",
            PrCategory::Features => "🚀 Features",
            PrCategory::BugFixes => "🐛 Bug Fixes",
            PrCategory::Maintenance => "🧰 Maintenance",
            PrCategory::Documentation => "📚 Documentation",
            PrCategory::Logistics => "⚙️ Logistics",
            PrCategory::Performance => "🐌 Performance",
            PrCategory::Tests => "🧪 Tests",
        }
    }

    /// Derives the category from a pull request title.
    ///
    /// Matching is case-insensitive and by keyword prefix, so
    /// "feature:", "fixes:" and "bugfix:" classify like "feat:" and
    /// "fix:". The first matching keyword group wins; titles without a
    /// recognized `keyword[(scope)]:` prefix are `General`.
    pub fn from_title(title: &str) -> Self {
        const KEYWORD_GROUPS: &[(&[&str], PrCategory)] = &[
            (&["feat"], PrCategory::Features),
            (&["bug", "fix"], PrCategory::BugFixes),
            (&["chore", "refactor"], PrCategory::Maintenance),
            (&["doc"], PrCategory::Documentation),
            (&["build", "ci"], PrCategory::Logistics),
            (&["perf"], PrCategory::Performance),
            (&["test"], PrCategory::Tests),
        ];

        let title = title.to_lowercase();
        let Some(captures) = title_prefix_regex().captures(&title) else {
            return PrCategory::General;
        };
        let keyword = &captures[1];

        for (keywords, category) in KEYWORD_GROUPS {
            if keywords.iter().any(|k| keyword.starts_with(k)) {
                return *category;
            }
        }

        PrCategory::General
    }
}

impl std::fmt::Display for PrCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Rendering mode for the assembled changelog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Plain,
    Pretty,
}

/// Fully resolved parameters for one changelog invocation.
#[derive(Debug, Clone)]
pub struct ChangelogRequest {
    pub repo: Repo,
    pub since: Option<String>,
    pub until: Option<String>,
    pub mode: OutputMode,
}

/// A merged pull request, flattened from the GraphQL search response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author_login: String,
    pub repo_name_with_owner: String,
}

impl PullRequest {
    pub fn category(&self) -> PrCategory {
        PrCategory::from_title(&self.title)
    }
}

/// Abstraction over the forge API calls the changelog needs, so tests
/// can substitute canned data for network access.
#[async_trait]
pub trait Forge {
    /// Publish date of the latest release, formatted for a search
    /// term.
    async fn latest_release_date(&self, owner: &str, name: &str) -> anyhow::Result<String>;

    /// All merged pull requests matching a GitHub search query.
    async fn search_merged_pull_requests(
        &self,
        search_query: &str,
    ) -> anyhow::Result<Vec<PullRequest>>;
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    pub data: SearchData,
}

#[derive(Debug, Deserialize)]
pub struct SearchData {
    pub search: SearchResults,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub nodes: Vec<GraphQLPullRequest>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLPullRequest {
    pub number: u64,
    pub title: String,
    pub author: Option<GraphQLAuthor>,
    pub repository: GraphQLRepository,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLAuthor {
    pub login: String,
    #[serde(rename = "__typename")]
    pub typename: String,
}

impl GraphQLAuthor {
    /// Returns the display format with the bot marker GitHub uses in
    /// its own UI.
    pub fn display_format(&self) -> String {
        if matches!(self.typename.as_str(), "Bot" | "App") {
            format!("{}[bot]", self.login)
        } else {
            self.login.clone()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRepository {
    pub name_with_owner: String,
}
