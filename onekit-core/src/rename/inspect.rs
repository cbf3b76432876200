use crate::descriptor::NodeMetadata;
use crate::rename::RenameKind;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// What a module currently calls its parts. Any fact may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub path: PathBuf,
    pub module_name: Option<String>,
    pub node_class: Option<String>,
    pub data_class: Option<String>,
    pub topic_var: Option<String>,
    pub topic_string: Option<String>,
    pub meta_name: Option<String>,
    pub config_name: Option<String>,
}

impl ModuleInfo {
    /// The name a rename of `kind` starts from.
    pub fn current_name(&self, kind: RenameKind) -> Option<&str> {
        match kind {
            RenameKind::Class => self.node_class.as_deref(),
            RenameKind::Module => self.module_name.as_deref(),
            RenameKind::Topic => self.topic_var.as_deref(),
            RenameKind::MetaName => self.meta_name.as_deref(),
        }
    }

    fn fill_from_metadata(&mut self, metadata: NodeMetadata) {
        self.module_name = metadata.module_name;
        self.node_class = metadata.node_class;
        self.data_class = metadata.data_class;
        self.topic_var = metadata.topic_var;
        self.topic_string = metadata.topic_string;
        self.meta_name = metadata.meta_name;
        self.config_name = metadata.config_name;
    }
}

fn or_na(value: Option<&String>) -> &str {
    value.map_or("N/A", String::as_str)
}

impl fmt::Display for ModuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current module information:")?;
        writeln!(f, "  Module name: {}", or_na(self.module_name.as_ref()))?;
        writeln!(f, "  Node class: {}", or_na(self.node_class.as_ref()))?;
        writeln!(f, "  Data class: {}", or_na(self.data_class.as_ref()))?;
        writeln!(f, "  Topic variable: {}", or_na(self.topic_var.as_ref()))?;
        writeln!(f, "  Topic string: \"{}\"", or_na(self.topic_string.as_ref()))?;
        writeln!(f, "  Meta::name: \"{}\"", or_na(self.meta_name.as_ref()))?;
        write!(f, "  Config name: {}", or_na(self.config_name.as_ref()))
    }
}

fn node_class_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"class\s+(\w+)\s*:\s*public\s+Node<(\w+)>").expect("valid regex")
    })
}

fn topic_register_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"ONE_TOPIC_REGISTER\((\w+),\s*(\w+),\s*"([^"]+)"\)"#).expect("valid regex")
    })
}

fn meta_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"static\s+constexpr\s+const\s+char\s*\*\s*name\s*=\s*"([^"]+)""#)
            .expect("valid regex")
    })
}

fn kconfig_symbol_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"config\s+(\w+)").expect("valid regex"))
}

/// `src/*.cpp` of a module, sorted by name.
pub fn source_files(module_dir: &Path) -> Vec<PathBuf> {
    let src = module_dir.join("src");
    if !src.is_dir() {
        return Vec::new();
    }
    WalkDir::new(&src)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == "cpp"))
        .collect()
}

/// The node class declared as `class X : public Node<X>`.
fn find_node_class(source: &str) -> Option<String> {
    node_class_pattern()
        .captures_iter(source)
        .find(|caps| caps[1] == caps[2])
        .map(|caps| caps[1].to_string())
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Collect what the generated files say about the module's names.
pub fn inspect_module(module_dir: &Path) -> Result<ModuleInfo> {
    let mut info = ModuleInfo {
        path: module_dir.to_path_buf(),
        ..Default::default()
    };

    match NodeMetadata::load(module_dir) {
        Ok(Some(metadata)) => {
            debug!("Using node metadata from {}", module_dir.display());
            info.fill_from_metadata(metadata);
        },
        Ok(None) => {},
        Err(e) => warn!("Ignoring unreadable node metadata: {e:#}"),
    }

    if info.module_name.is_none() {
        let module_yml = module_dir.join("zephyr").join("module.yml");
        if let Some(content) = read_optional(&module_yml)? {
            match serde_yaml::from_str::<serde_yaml::Value>(&content) {
                Ok(doc) => {
                    info.module_name = doc
                        .get("name")
                        .and_then(serde_yaml::Value::as_str)
                        .map(str::to_string);
                },
                Err(e) => warn!("Could not parse {}: {}", module_yml.display(), e),
            }
        }
    }

    if info.config_name.is_none() {
        let kconfig = module_dir.join("zephyr").join("Kconfig");
        if let Some(content) = read_optional(&kconfig)? {
            info.config_name = kconfig_symbol_pattern()
                .captures(&content)
                .map(|caps| caps[1].to_string());
        }
    }

    if let Some(source_path) = source_files(module_dir).into_iter().next() {
        let source = fs::read_to_string(&source_path)
            .with_context(|| format!("Failed to read {}", source_path.display()))?;

        if info.node_class.is_none() {
            info.node_class = find_node_class(&source);
        }
        if let Some(caps) = topic_register_pattern().captures(&source) {
            info.data_class.get_or_insert_with(|| caps[1].to_string());
            info.topic_var.get_or_insert_with(|| caps[2].to_string());
            info.topic_string.get_or_insert_with(|| caps[3].to_string());
        }
        if info.meta_name.is_none() {
            info.meta_name = meta_name_pattern()
                .captures(&source)
                .map(|caps| caps[1].to_string());
        }
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SOURCE: &str = r#"
#include "MotorData.hpp"

ONE_TOPIC_REGISTER(MotorData, topic_motor, "motor_data");

class MotorNode : public Node<MotorNode>
{
public:
    struct Meta
    {
        static constexpr size_t stack_size = 2048;
        static constexpr const char* name = "motor";
    };
};

ONE_NODE_REGISTER(MotorNode);
"#;

    fn write_module(root: &Path) {
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("zephyr")).unwrap();
        fs::write(root.join("src/MotorNode.cpp"), SOURCE).unwrap();
        fs::write(root.join("zephyr/module.yml"), "name: motor\n").unwrap();
        fs::write(root.join("zephyr/Kconfig"), "config MOTOR\n\tbool \"motor\"\n").unwrap();
    }

    #[test]
    fn test_inspect_from_patterns() {
        let temp_dir = TempDir::new().unwrap();
        write_module(temp_dir.path());

        let info = inspect_module(temp_dir.path()).unwrap();
        assert_eq!(info.module_name.as_deref(), Some("motor"));
        assert_eq!(info.config_name.as_deref(), Some("MOTOR"));
        assert_eq!(info.node_class.as_deref(), Some("MotorNode"));
        assert_eq!(info.data_class.as_deref(), Some("MotorData"));
        assert_eq!(info.topic_var.as_deref(), Some("topic_motor"));
        assert_eq!(info.topic_string.as_deref(), Some("motor_data"));
        assert_eq!(info.meta_name.as_deref(), Some("motor"));
    }

    #[test]
    fn test_class_name_must_repeat() {
        assert_eq!(find_node_class("class A : public Node<B> {}"), None);
        assert_eq!(
            find_node_class("class A : public Node<B> {}\nclass C : public Node<C> {}"),
            Some("C".to_string())
        );
    }

    #[test]
    fn test_empty_dir_has_no_facts() {
        let temp_dir = TempDir::new().unwrap();
        let info = inspect_module(temp_dir.path()).unwrap();
        assert_eq!(info.module_name, None);
        assert_eq!(info.node_class, None);
        assert!(info.to_string().contains("Node class: N/A"));
    }

    #[test]
    fn test_metadata_takes_precedence() {
        let temp_dir = TempDir::new().unwrap();
        write_module(temp_dir.path());
        NodeMetadata {
            node_class: Some("RenamedNode".to_string()),
            ..Default::default()
        }
        .save(temp_dir.path())
        .unwrap();

        let info = inspect_module(temp_dir.path()).unwrap();
        assert_eq!(info.node_class.as_deref(), Some("RenamedNode"));
        // Gaps are still filled from the sources.
        assert_eq!(info.topic_var.as_deref(), Some("topic_motor"));
        assert_eq!(info.module_name.as_deref(), Some("motor"));
    }

    #[test]
    fn test_first_source_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("B.cpp"), "class BNode : public Node<BNode> {};").unwrap();
        fs::write(src.join("A.cpp"), "class ANode : public Node<ANode> {};").unwrap();
        fs::write(src.join("notes.txt"), "class X : public Node<X>").unwrap();

        assert_eq!(source_files(temp_dir.path()).len(), 2);
        let info = inspect_module(temp_dir.path()).unwrap();
        assert_eq!(info.node_class.as_deref(), Some("ANode"));
    }

    #[test]
    fn test_current_name_by_kind() {
        let info = ModuleInfo {
            node_class: Some("FanNode".to_string()),
            topic_var: Some("topic_fan".to_string()),
            ..Default::default()
        };
        assert_eq!(info.current_name(RenameKind::Class), Some("FanNode"));
        assert_eq!(info.current_name(RenameKind::Topic), Some("topic_fan"));
        assert_eq!(info.current_name(RenameKind::Module), None);
    }
}
