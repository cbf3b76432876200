//! `{KEY}` placeholder substitution and the embedded node templates.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::path::Path;

/// Placeholder name -> rendered value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) {
        self.values.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Replace every `{key}` of the context. Anything else in braces is left alone.
pub fn render(template: &str, context: &TemplateContext) -> String {
    let mut output = template.to_string();
    for (key, value) in context.iter() {
        let placeholder = format!("{{{}}}", key);
        output = output.replace(&placeholder, value);
    }
    output
}

/// Render `template` and write it to `output_path`, replacing any existing file.
pub fn render_to_file(template: &str, output_path: &Path, context: &TemplateContext) -> Result<()> {
    let content = render(template, context);
    fs::write(output_path, content)
        .with_context(|| format!("Failed to write {}", output_path.display()))
}

/// Files generated for every node module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTemplate {
    CMakeLists,
    Kconfig,
    ModuleYml,
    NodeSource,
    DataHeader,
    GitIgnore,
    NestedManifest,
}

impl NodeTemplate {
    /// The templates rendered for every module, in generation order.
    pub const STANDARD: [Self; 6] = [
        Self::CMakeLists,
        Self::Kconfig,
        Self::ModuleYml,
        Self::NodeSource,
        Self::DataHeader,
        Self::GitIgnore,
    ];

    pub fn content(self) -> &'static str {
        match self {
            Self::CMakeLists => include_str!("../templates/CMakeLists.txt.template"),
            Self::Kconfig => include_str!("../templates/Kconfig.template"),
            Self::ModuleYml => include_str!("../templates/module.yml.template"),
            Self::NodeSource => include_str!("../templates/node.cpp.template"),
            Self::DataHeader => include_str!("../templates/data.hpp.template"),
            Self::GitIgnore => include_str!("../templates/gitignore.template"),
            Self::NestedManifest => include_str!("../templates/west.yml.template"),
        }
    }

    /// Output path relative to the module directory.
    pub fn output_path(self, context: &TemplateContext) -> String {
        match self {
            Self::CMakeLists => "CMakeLists.txt".to_string(),
            Self::Kconfig => "zephyr/Kconfig".to_string(),
            Self::ModuleYml => "zephyr/module.yml".to_string(),
            Self::NodeSource => format!("src/{}.cpp", context.get("NodeClass").unwrap_or("Node")),
            Self::DataHeader => {
                format!("include/{}.hpp", context.get("DataClass").unwrap_or("Data"))
            },
            Self::GitIgnore => ".gitignore".to_string(),
            Self::NestedManifest => "west.yml".to_string(),
        }
    }
}
