//! Git URL handling and the optional repository setup of a new module.

use crate::error::NodeError;
use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

fn repo_url_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"^https://github\.com/([^/]+)/(.+?)(?:\.git)?/?$").expect("valid regex"),
            Regex::new(r"^git@github\.com:([^/]+)/(.+?)(?:\.git)?$").expect("valid regex"),
            // Any other host: take the last two path segments.
            Regex::new(r"^(?:https?://|git@)[^/:]+[/:](?:.*/)?([^/]+)/([^/]+?)(?:\.git)?/?$")
                .expect("valid regex"),
        ]
    })
}

/// Whether `target` looks like a git remote rather than a local path.
pub fn is_git_url(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://") || target.starts_with("git@")
}

/// `(org, repo)` of a remote URL, if its shape is recognised.
pub fn parse_repo_url(url: &str) -> Option<(String, String)> {
    repo_url_patterns().iter().find_map(|re| {
        re.captures(url)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    })
}

/// Default module name for a remote: the repository segment.
pub fn repo_name_from_url(url: &str) -> String {
    if let Some((_, repo)) = parse_repo_url(url) {
        return repo;
    }

    let last = url
        .trim_end_matches('/')
        .rsplit(|c| c == '/' || c == ':')
        .next()
        .unwrap_or(url);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

/// Run one git command in `dir`, mapping any failure to `GitOperationFailed`.
fn run_git(dir: &Path, args: &[&str]) -> Result<()> {
    debug!("git {}", args.join(" "));
    let command = args.first().copied().unwrap_or_default().to_string();

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| NodeError::GitOperationFailed {
            command: command.clone(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let error = String::from_utf8_lossy(&output.stderr);
        return Err(NodeError::GitOperationFailed {
            command,
            message: error.trim().to_string(),
        }
        .into());
    }
    Ok(())
}

/// Outcome of each git step run by [`init_repository`].
#[derive(Debug, Default)]
pub struct GitSetupReport {
    pub completed: Vec<String>,
    pub failed: Vec<String>,
}

impl GitSetupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Initialize a repository in `dir`, commit the generated files and, when a
/// remote URL is given, register it as `remote_name` and push to it. Never fails: each failing step is logged and
/// recorded, later steps that depend on it are skipped.
pub fn init_repository(dir: &Path, remote_url: Option<&str>, remote_name: &str) -> GitSetupReport {
    let mut report = GitSetupReport::default();

    let mut steps: Vec<Vec<&str>> = vec![
        vec!["init"],
        vec!["add", "."],
        vec!["commit", "-m", "Initial commit"],
    ];
    if let Some(url) = remote_url {
        steps.push(vec!["remote", "add", remote_name, url]);
        steps.push(vec!["push", "-u", remote_name, "HEAD"]);
    }

    for step in steps {
        let label = step.join(" ");
        if let Some(failed) = report.failed.first() {
            debug!("Skipping 'git {}' after '{}' failed", label, failed);
            continue;
        }
        match run_git(dir, &step) {
            Ok(()) => report.completed.push(label),
            Err(e) => {
                warn!("{e:#}");
                report.failed.push(label);
            },
        }
    }

    if report.is_clean() {
        info!("Initialized git repository in {}", dir.display());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_git_url() {
        assert!(is_git_url("https://github.com/org/repo.git"));
        assert!(is_git_url("http://example.com/repo"));
        assert!(is_git_url("git@github.com:org/repo.git"));
        assert!(!is_git_url("modules/lib/nodes/motor"));
        assert!(!is_git_url("/abs/path"));
    }

    #[test]
    fn test_parse_github_https() {
        assert_eq!(
            parse_repo_url("https://github.com/one-org/imu-hub.git"),
            Some(("one-org".to_string(), "imu-hub".to_string()))
        );
        assert_eq!(
            parse_repo_url("https://github.com/one-org/imu-hub"),
            Some(("one-org".to_string(), "imu-hub".to_string()))
        );
    }

    #[test]
    fn test_parse_github_ssh() {
        assert_eq!(
            parse_repo_url("git@github.com:one-org/imu-hub.git"),
            Some(("one-org".to_string(), "imu-hub".to_string()))
        );
    }

    #[test]
    fn test_parse_other_hosts() {
        assert_eq!(
            parse_repo_url("https://gitlab.example.com/group/sub/fan.git"),
            Some(("sub".to_string(), "fan".to_string()))
        );
        assert_eq!(
            parse_repo_url("git@gitlab.example.com:group/fan.git"),
            Some(("group".to_string(), "fan".to_string()))
        );
    }

    #[test]
    fn test_repo_name_from_url() {
        assert_eq!(
            repo_name_from_url("https://github.com/org/led-controller.git"),
            "led-controller"
        );
        assert_eq!(repo_name_from_url("https://host/motor.git"), "motor");
    }

    #[test]
    fn test_init_in_missing_dir_reports_failure_without_panicking() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let report = init_repository(&missing, None, "origin");
        assert!(!report.is_clean());
        assert_eq!(report.failed, vec!["init".to_string()]);
        assert!(report.completed.is_empty());
    }
}
