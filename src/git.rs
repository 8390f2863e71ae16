//! Local git metadata: the repository behind the current checkout's
//! `origin` remote, and the checkout toplevel directory.

use std::process::Command;

use anyhow::{Context, Result};

use crate::types::Repo;

fn git_command(args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .output()
        .context("failed to run git")?;

    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8(output.stdout).context("git output was not valid UTF-8")?;
    Ok(stdout.trim().to_string())
}

/// Resolves the repository the current checkout tracks via its
/// `origin` remote.
pub fn current_repository() -> Result<Repo> {
    let remote_url = git_command(&["remote", "get-url", "origin"])
        .context("cannot determine the current repository (no 'origin' remote?)")?;
    parse_remote_url(&remote_url)
}

/// Toplevel directory of the current checkout.
pub fn toplevel_dir() -> Result<String> {
    git_command(&["rev-parse", "--show-toplevel"]).context("not inside a git checkout")
}

/// Extracts `owner/repo` from an https, ssh, or scp-style remote URL.
fn parse_remote_url(remote_url: &str) -> Result<Repo> {
    let path = if let Ok(url) = url::Url::parse(remote_url) {
        url.path().trim_start_matches('/').to_string()
    } else if let Some((_, path)) = remote_url.split_once(':') {
        // scp-style: git@github.com:owner/repo.git
        path.trim_start_matches('/').to_string()
    } else {
        anyhow::bail!("unsupported remote URL: '{remote_url}'");
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut segments = path.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok(Repo::new(owner, Some(name.to_string())))
        }
        _ => anyhow::bail!("remote URL '{remote_url}' does not point at an owner/repo path"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_https_remote() {
        let repo = parse_remote_url("https://github.com/acme/widgets.git").unwrap();
        assert_eq!(repo, Repo::new("acme", Some("widgets".to_string())));
    }

    #[test]
    fn parses_https_remote_without_git_suffix() {
        let repo = parse_remote_url("https://github.com/acme/widgets").unwrap();
        assert_eq!(repo, Repo::new("acme", Some("widgets".to_string())));
    }

    #[test]
    fn parses_scp_style_remote() {
        let repo = parse_remote_url("git@github.com:acme/widgets.git").unwrap();
        assert_eq!(repo, Repo::new("acme", Some("widgets".to_string())));
    }

    #[test]
    fn parses_ssh_remote() {
        let repo = parse_remote_url("ssh://git@github.com/acme/widgets.git").unwrap();
        assert_eq!(repo, Repo::new("acme", Some("widgets".to_string())));
    }

    #[test]
    fn rejects_remote_without_repo_path() {
        assert!(parse_remote_url("https://github.com/acme").is_err());
        assert!(parse_remote_url("https://github.com/a/b/c").is_err());
    }
}
