//! Environment provisioning: locate an interpreter of the pinned version.
//!
//! Candidate program names are probed in order (`python3.11`, `python3`,
//! `python` by default). Each found program is asked for `--version` and the
//! reported version must start with the pinned version, component-wise.
//! No candidate matching is a fatal [`Error::Provisioning`].

use std::path::PathBuf;

use regex::Regex;

use crate::pipeline::utils::process::run_tool;
use crate::pipeline::{Error, Result, Settings};

/// Locates the pinned interpreter and returns its path.
pub async fn run(settings: &Settings) -> Result<PathBuf> {
    let pinned = &settings.manifest().python.version;
    let candidates = settings.interpreter_candidates();
    let mut probed = Vec::new();

    for candidate in &candidates {
        let path = match which::which(candidate) {
            Ok(path) => path,
            Err(_) => {
                log::debug!("interpreter candidate '{}' not on PATH", candidate);
                probed.push(format!("{}: not found", candidate));
                continue;
            }
        };

        let output = run_tool(&path, &["--version"], None)
            .await
            .map_err(|e| Error::Provisioning {
                reason: format!("failed to run {} --version: {}", path.display(), e),
            })?;
        if !output.success() {
            probed.push(format!("{}: {}", candidate, output.failure_detail()));
            continue;
        }

        // Old interpreters print the version banner to stderr
        let banner = if output.stdout.trim().is_empty() {
            output.stderr_tail.join(" ")
        } else {
            output.stdout.clone()
        };

        match parse_reported_version(&banner) {
            Some(reported) if version_matches(pinned, &reported) => {
                log::info!(
                    "provisioned interpreter {} ({})",
                    path.display(),
                    reported
                );
                return Ok(path);
            }
            Some(reported) => {
                probed.push(format!("{}: version {}", candidate, reported));
            }
            None => {
                probed.push(format!("{}: unrecognized banner '{}'", candidate, banner.trim()));
            }
        }
    }

    Err(Error::Provisioning {
        reason: format!(
            "no interpreter matching pinned version {} ({})",
            pinned,
            probed.join("; ")
        ),
    })
}

/// Extracts the dotted version from a `Python X.Y.Z` banner.
fn parse_reported_version(banner: &str) -> Option<String> {
    // Compiled per probe; provisioning runs a handful of times per run
    let re = Regex::new(r"Python (\d+(?:\.\d+)*)").ok()?;
    re.captures(banner)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Component-wise prefix match: pinned "3.11" accepts reported "3.11.9".
fn version_matches(pinned: &str, reported: &str) -> bool {
    let pinned: Vec<&str> = pinned.split('.').collect();
    let reported: Vec<&str> = reported.split('.').collect();
    pinned.len() <= reported.len() && pinned.iter().zip(&reported).all(|(p, r)| p == r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_version_banner() {
        assert_eq!(
            parse_reported_version("Python 3.11.9").as_deref(),
            Some("3.11.9")
        );
        assert_eq!(parse_reported_version("Python 3").as_deref(), Some("3"));
        assert_eq!(parse_reported_version("not python"), None);
    }

    #[test]
    fn minor_pin_accepts_any_patch() {
        assert!(version_matches("3.11", "3.11.9"));
        assert!(version_matches("3.11", "3.11.0"));
        assert!(version_matches("3", "3.12.1"));
    }

    #[test]
    fn pin_match_is_component_wise_not_textual() {
        // "3.1" must not accept "3.11.x"
        assert!(!version_matches("3.1", "3.11.9"));
        assert!(!version_matches("3.11", "3.1.2"));
        assert!(!version_matches("3.12", "3.11.9"));
    }

    #[test]
    fn exact_pin_requires_full_version() {
        assert!(version_matches("3.11.9", "3.11.9"));
        assert!(!version_matches("3.11.9", "3.11"));
    }
}
