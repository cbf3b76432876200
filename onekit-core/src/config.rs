use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".onekit";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Where new node modules go, relative to the workspace root
    #[serde(default = "default_nodes_dir")]
    pub nodes_dir: String,

    #[serde(default = "default_stack_size")]
    pub stack_size: u32,

    #[serde(default = "default_priority")]
    pub priority: i32,

    /// Revision written for git-sourced manifest entries
    #[serde(default = "default_revision")]
    pub revision: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Whether rename-node backs up the module before applying
    #[serde(default = "default_true")]
    pub backup: bool,

    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            nodes_dir: default_nodes_dir(),
            stack_size: default_stack_size(),
            priority: default_priority(),
            revision: default_revision(),
            remote: default_remote(),
            backup: true,
            manifest_file: default_manifest_file(),
        }
    }
}

fn default_nodes_dir() -> String {
    "modules/lib/nodes".to_string()
}

fn default_stack_size() -> u32 {
    2048
}

fn default_priority() -> i32 {
    5
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_manifest_file() -> String {
    "west.yml".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load config from `<root>/.onekit/config.toml` if it exists
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = Self::path_in(root);
        if config_path.exists() {
            return Self::load_from_path(&config_path);
        }

        Ok(Self::default())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save config to `<root>/.onekit/config.toml`
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = root.join(CONFIG_DIR);
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        self.save_to_path(&config_dir.join(CONFIG_FILE))
    }

    /// Save config to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.defaults.nodes_dir, "modules/lib/nodes");
        assert_eq!(config.defaults.stack_size, 2048);
        assert_eq!(config.defaults.priority, 5);
        assert_eq!(config.defaults.revision, "main");
        assert_eq!(config.defaults.remote, "origin");
        assert!(config.defaults.backup);
        assert_eq!(config.defaults.manifest_file, "west.yml");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.defaults.stack_size, 2048);
    }

    #[test]
    fn test_load_save_config() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = Config::default();
        config.defaults.nodes_dir = "nodes".to_string();
        config.defaults.backup = false;
        config.defaults.priority = 7;
        config.save(temp_dir.path()).unwrap();

        let loaded = Config::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.defaults.nodes_dir, "nodes");
        assert!(!loaded.defaults.backup);
        assert_eq!(loaded.defaults.priority, 7);
    }

    #[test]
    fn test_partial_config() {
        let toml_content = r#"
[defaults]
stack_size = 4096
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.defaults.stack_size, 4096);
        assert_eq!(config.defaults.priority, 5);
        assert_eq!(config.defaults.nodes_dir, "modules/lib/nodes");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = Config::path_in(temp_dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[defaults\nstack_size = ").unwrap();

        assert!(Config::load(temp_dir.path()).is_err());
    }
}
