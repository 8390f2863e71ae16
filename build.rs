//! Build script for gh-changelog - embeds version information.
//!
//! Prefers `git describe --tags --always --dirty` when the build runs
//! inside a tagged checkout; otherwise a pseudo-version is generated
//! from the Cargo.toml version, a timestamp, and the commit hash.

use std::{env, process::Command};

use chrono::Utc;

fn main() {
    ["src", "build.rs", "Cargo.toml"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", build_info());
}

/// Executes a command and returns the trimmed stdout, or None if the
/// command failed or produced nothing.
fn run(cmd: &str, args: &[&str]) -> Option<String> {
    Command::new(cmd)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Git-derived version string, falling back to a pseudo-version when
/// no tags exist or git is unavailable.
fn git_version() -> String {
    if let Some(desc) = run("git", &["describe", "--tags", "--always", "--dirty"]) {
        // A bare hash means no tags are reachable; use the
        // pseudo-version in that case.
        if desc.contains('v') || desc.contains("-g") {
            return desc;
        }
    }

    let commit =
        run("git", &["rev-parse", "--short=12", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");

    format!("v{}-{timestamp}-{commit}", env!("CARGO_PKG_VERSION"))
}

/// Human-readable version info for clap's `--version` output.
fn build_info() -> String {
    [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        Some(format!("({})", git_version())),
        run("rustc", &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}
