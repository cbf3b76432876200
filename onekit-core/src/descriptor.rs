//! Per-module files: the module descriptor (`zephyr/module.yml`) and the
//! sidecar metadata (`node.yml`) the scaffolder writes next to the sources.

use crate::error::NodeError;
use crate::manifest::ProjectEntry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SIDECAR_FILE: &str = "node.yml";

/// Where a module descriptor may live, in lookup order.
const DESCRIPTOR_CANDIDATES: [&str; 2] = ["zephyr/module.yml", "module.yml"];

/// What a module declares about itself in `module.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleYml {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ModuleYml {
    pub fn find(module_dir: &Path) -> Option<PathBuf> {
        DESCRIPTOR_CANDIDATES
            .iter()
            .map(|candidate| module_dir.join(candidate))
            .find(|path| path.is_file())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let parsed: Option<Self> =
            serde_yaml::from_str(&content).map_err(|e| NodeError::parse(path, e))?;
        Ok(parsed.unwrap_or_default())
    }

    /// Load the descriptor of `module_dir`, failing with `NotAModule` if it has none.
    pub fn load_from_module(module_dir: &Path) -> Result<(PathBuf, Self)> {
        let path =
            Self::find(module_dir).ok_or_else(|| NodeError::NotAModule(module_dir.to_path_buf()))?;
        let descriptor = Self::load(&path)?;
        Ok((path, descriptor))
    }
}

/// A module as the importer sees it, before it is projected into the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub path: String,
    pub url: Option<String>,
    pub remote: Option<String>,
    pub revision: Option<String>,
    pub repo_path: Option<String>,
    pub dependencies: Vec<String>,
}

impl ModuleDescriptor {
    pub fn to_project_entry(&self) -> ProjectEntry {
        ProjectEntry {
            name: self.name.clone(),
            path: self.path.clone(),
            url: self.url.clone(),
            remote: self.remote.clone(),
            repo_path: self.repo_path.clone(),
            revision: self.revision.clone(),
        }
    }
}

/// Names baked into the generated sources, recorded at creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
}

impl NodeMetadata {
    pub fn path(module_dir: &Path) -> PathBuf {
        module_dir.join(SIDECAR_FILE)
    }

    /// Read the sidecar if the module has one.
    pub fn load(module_dir: &Path) -> Result<Option<Self>> {
        let path = Self::path(module_dir);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let metadata: Option<Self> =
            serde_yaml::from_str(&content).map_err(|e| NodeError::parse(&path, e))?;
        Ok(Some(metadata.unwrap_or_default()))
    }

    pub fn save(&self, module_dir: &Path) -> Result<()> {
        let path = Self::path(module_dir);
        let content = serde_yaml::to_string(self).context("Failed to serialize node metadata")?;
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}
