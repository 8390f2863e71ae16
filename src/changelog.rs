//! Changelog assembly: grouping fetched pull requests and rendering
//! them as plain lines or as a Markdown document.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::types::{PrCategory, PullRequest};

/// Section order of the markdown document.
const SECTION_ORDER: [PrCategory; 8] = [
    PrCategory::Features,
    PrCategory::BugFixes,
    PrCategory::Maintenance,
    PrCategory::Tests,
    PrCategory::Performance,
    PrCategory::Documentation,
    PrCategory::Logistics,
    PrCategory::General,
];

fn changelog_line(pr: &PullRequest, repo_prefix: &str) -> String {
    format!(
        "{repo_prefix}#{} {} (@{})",
        pr.number, pr.title, pr.author_login
    )
}

/// Renders one line per pull request, grouped by repository.
///
/// Repository names are sorted alphabetically and only printed when
/// the result spans more than one repository (an organization-wide
/// changelog).
pub fn render_plain(prs: &[PullRequest]) -> String {
    let mut by_repo: BTreeMap<&str, Vec<&PullRequest>> = BTreeMap::new();
    for pr in prs {
        by_repo
            .entry(pr.repo_name_with_owner.as_str())
            .or_default()
            .push(pr);
    }

    let show_repo_name = by_repo.len() > 1;

    let mut out = String::new();
    for (name_with_owner, repo_prs) in &by_repo {
        let repo_prefix = if show_repo_name { *name_with_owner } else { "" };
        for pr in repo_prs {
            out.push_str(&changelog_line(pr, repo_prefix));
            out.push('\n');
        }
    }
    out
}

/// Renders a Markdown document with one section per category.
///
/// Every category emits its header, empty or not. Within a section,
/// entries are sorted by repository so changes of the same repository
/// appear together; the repository prefix follows the same
/// more-than-one-repo rule as plain output.
pub fn render_markdown(prs: &[PullRequest]) -> String {
    let mut by_category: HashMap<PrCategory, Vec<&PullRequest>> = HashMap::new();
    let mut repos = BTreeSet::new();
    for pr in prs {
        by_category.entry(pr.category()).or_default().push(pr);
        repos.insert(pr.repo_name_with_owner.as_str());
    }

    for category_prs in by_category.values_mut() {
        category_prs.sort_by(|a, b| a.repo_name_with_owner.cmp(&b.repo_name_with_owner));
    }

    let show_repo_name = repos.len() > 1;

    let mut out = String::from("# Changelog\n\n");
    for category in SECTION_ORDER {
        let category_prs = by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default();
        add_section(&mut out, category, category_prs, show_repo_name);
    }
    out
}

fn add_section(out: &mut String, category: PrCategory, prs: &[&PullRequest], use_prefix: bool) {
    out.push_str("## ");
    out.push_str(category.pretty());
    out.push_str("\n\n");

    for pr in prs {
        let repo_prefix = if use_prefix {
            pr.repo_name_with_owner.as_str()
        } else {
            ""
        };
        out.push_str("- ");
        out.push_str(&changelog_line(pr, repo_prefix));
        out.push('\n');
    }

    out.push('\n');
}
