//! Editing the `manifest.projects` list of a `west.yml` document.
//!
//! The document is kept as a generic YAML value so keys the tool does not
//! know about survive a load/save cycle in their original order. Comments are
//! not preserved.

use crate::error::NodeError;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

const MANIFEST_KEY: &str = "manifest";
const PROJECTS_KEY: &str = "projects";

/// One entry of `manifest.projects`, as written by this tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(
        rename = "repo-path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub repo_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl ProjectEntry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            url: None,
            remote: None,
            repo_path: None,
            revision: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    root: Value,
}

impl Default for ManifestDocument {
    fn default() -> Self {
        Self {
            root: Value::Mapping(Mapping::new()),
        }
    }
}

impl ManifestDocument {
    /// Load a manifest. Fails with `NotFound` or `ParseError`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(NodeError::not_found("manifest", path).into());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;

        Self::parse(&content).map_err(|message| NodeError::parse(path, message).into())
    }

    /// Parse manifest text, checking the shape of `manifest.projects`.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let root: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;

        let root = match root {
            Value::Null => Value::Mapping(Mapping::new()),
            Value::Mapping(_) => root,
            _ => return Err("document root is not a mapping".to_string()),
        };

        match root.get(MANIFEST_KEY) {
            None | Some(Value::Null) => {},
            Some(Value::Mapping(manifest)) => match manifest.get(PROJECTS_KEY) {
                None | Some(Value::Null | Value::Sequence(_)) => {},
                Some(_) => return Err("'manifest.projects' is not a list".to_string()),
            },
            Some(_) => return Err("'manifest' is not a mapping".to_string()),
        }

        Ok(Self { root })
    }

    /// Write the document back, keeping key and entry order.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_yaml_string()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write manifest {}", path.display()))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(&self.root).context("Failed to serialize manifest")
    }

    fn projects(&self) -> &[Value] {
        self.root
            .get(MANIFEST_KEY)
            .and_then(|m| m.get(PROJECTS_KEY))
            .and_then(Value::as_sequence)
            .map_or(&[][..], Vec::as_slice)
    }

    fn projects_mut(&mut self) -> Result<&mut Vec<Value>> {
        let root = self
            .root
            .as_mapping_mut()
            .ok_or_else(|| anyhow!("manifest root is not a mapping"))?;

        let manifest = root
            .entry(Value::from(MANIFEST_KEY))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if manifest.is_null() {
            *manifest = Value::Mapping(Mapping::new());
        }
        let manifest = manifest
            .as_mapping_mut()
            .ok_or_else(|| anyhow!("'manifest' is not a mapping"))?;

        let projects = manifest
            .entry(Value::from(PROJECTS_KEY))
            .or_insert_with(|| Value::Sequence(Vec::new()));
        if projects.is_null() {
            *projects = Value::Sequence(Vec::new());
        }
        projects
            .as_sequence_mut()
            .ok_or_else(|| anyhow!("'manifest.projects' is not a list"))
    }

    fn entry_name(entry: &Value) -> Option<&str> {
        entry.get("name").and_then(Value::as_str)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.projects()
            .iter()
            .any(|p| Self::entry_name(p) == Some(name))
    }

    /// Drop every entry called `name`. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        let projects = self.projects_mut()?;
        let before = projects.len();
        projects.retain(|p| Self::entry_name(p) != Some(name));
        Ok(projects.len() != before)
    }

    /// Append an entry. Uniqueness is the caller's job; check `exists` first.
    pub fn append(&mut self, entry: &ProjectEntry) -> Result<()> {
        let value = serde_yaml::to_value(entry).context("Failed to serialize project entry")?;
        self.projects_mut()?.push(value);
        Ok(())
    }

    pub fn project_names(&self) -> Vec<String> {
        self.projects()
            .iter()
            .filter_map(Self::entry_name)
            .map(str::to_string)
            .collect()
    }

    pub fn project(&self, name: &str) -> Option<ProjectEntry> {
        self.projects()
            .iter()
            .find(|p| Self::entry_name(p) == Some(name))
            .and_then(|p| serde_yaml::from_value(p.clone()).ok())
    }
}
