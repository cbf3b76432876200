//! Locating the workspace root and its manifest.

use crate::error::NodeError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const WORKSPACE_MARKER: &str = ".west";
pub const DEFAULT_MANIFEST_FILE: &str = "west.yml";

/// Decides which directory the operations treat as the workspace root.
pub trait RootResolver {
    fn resolve_root(&self) -> PathBuf;
}

/// The nearest ancestor of `start` holding a `.west/` directory, else `start`.
#[derive(Debug, Clone)]
pub struct WestWorkspace {
    start: PathBuf,
}

impl WestWorkspace {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
        }
    }

    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::new(cwd))
    }

    pub fn start(&self) -> &Path {
        &self.start
    }
}

impl RootResolver for WestWorkspace {
    fn resolve_root(&self) -> PathBuf {
        find_upwards(&self.start, |dir| dir.join(WORKSPACE_MARKER).is_dir())
            .unwrap_or_else(|| self.start.clone())
    }
}

/// Always the same directory.
#[derive(Debug, Clone)]
pub struct FixedRoot(pub PathBuf);

impl RootResolver for FixedRoot {
    fn resolve_root(&self) -> PathBuf {
        self.0.clone()
    }
}

fn find_upwards(start: &Path, matches: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| matches(dir))
        .map(Path::to_path_buf)
}

/// Find the workspace manifest for a command started in `start`.
///
/// Looks for `manifest_file` in `start` and its parents, then asks
/// `<root>/.west/config` where the manifest repository lives.
pub fn find_manifest(start: &Path, root: &Path, manifest_file: &str) -> Result<PathBuf> {
    if let Some(dir) = find_upwards(start, |dir| dir.join(manifest_file).is_file()) {
        let path = dir.join(manifest_file);
        debug!("Found manifest at {}", path.display());
        return Ok(path);
    }

    let west_config = root.join(WORKSPACE_MARKER).join("config");
    if west_config.is_file() {
        let content = fs::read_to_string(&west_config)
            .with_context(|| format!("Failed to read {}", west_config.display()))?;
        if let Some(manifest_dir) = ini_value(&content, "manifest", "path") {
            let file = ini_value(&content, "manifest", "file")
                .unwrap_or_else(|| DEFAULT_MANIFEST_FILE.to_string());
            let path = root.join(manifest_dir).join(file);
            if path.is_file() {
                debug!("Found manifest via {}: {}", west_config.display(), path.display());
                return Ok(path);
            }
        }
    }

    Err(NodeError::not_found("manifest", start.join(manifest_file)).into())
}

/// Value of `key` in `[section]` of an INI-style file.
fn ini_value(content: &str, section: &str, key: &str) -> Option<String> {
    let mut in_section = false;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = name.trim() == section;
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            if k.trim() == key {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

/// `path` relative to `root` with forward slashes, when it lies inside `root`.
pub fn relative_to_root(path: &Path, root: &Path) -> Option<String> {
    let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let relative = path.strip_prefix(&root).ok()?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}
