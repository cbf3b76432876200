//! Generating a new node module from the embedded templates.

use crate::config::Config;
use crate::descriptor::{NodeMetadata, SIDECAR_FILE};
use crate::error::NodeError;
use crate::git::{self, GitSetupReport};
use crate::manifest::{ManifestDocument, ProjectEntry};
use crate::naming::{validate_name, NameSet};
use crate::template::{render_to_file, NodeTemplate, TemplateContext};
use crate::workspace::{find_manifest, relative_to_root};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What `create-node` was asked to build.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    /// A git URL or a plain module name
    pub target: String,
    pub output: Option<PathBuf>,
    pub data_type: Option<String>,
    pub stack_size: Option<u32>,
    pub priority: Option<i32>,
    pub meta_name: Option<String>,
    pub topic_name: Option<String>,
    pub topic_string: Option<String>,
    pub force: bool,
    pub add_to_manifest: bool,
    pub init_git: bool,
}

/// A module name plus the repository it comes from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTarget {
    pub name: String,
    pub git_url: Option<String>,
}

impl NodeTarget {
    pub fn parse(target: &str) -> Self {
        if git::is_git_url(target) {
            Self {
                name: git::repo_name_from_url(target),
                git_url: Some(target.to_string()),
            }
        } else {
            Self {
                name: target.to_string(),
                git_url: None,
            }
        }
    }
}

/// Everything generated for one module.
#[derive(Debug)]
pub struct ScaffoldReport {
    pub module_name: String,
    pub module_dir: PathBuf,
    pub node_class: String,
    pub data_class: String,
    pub config_name: String,
    /// Generated files, relative to `module_dir`
    pub files: Vec<String>,
    /// Manifest the module was added to
    pub manifest: Option<PathBuf>,
    pub git: Option<GitSetupReport>,
    pub warnings: Vec<String>,
}

/// The placeholder values for one module.
pub fn build_template_context(
    names: &NameSet,
    options: &ScaffoldOptions,
    config: &Config,
) -> TemplateContext {
    let data_class = options
        .data_type
        .clone()
        .unwrap_or_else(|| format!("{}Data", names.pascal));

    let mut ctx = TemplateContext::new();
    ctx.insert("MODULE_NAME", &names.kebab);
    ctx.insert("CONFIG_NAME", &names.upper_snake);
    ctx.insert("NodeClass", format!("{}Node", names.pascal));
    ctx.insert("DESCRIPTION", format!("{} node for OneFramework", names.kebab));
    ctx.insert(
        "STACK_SIZE",
        options.stack_size.unwrap_or(config.defaults.stack_size),
    );
    ctx.insert(
        "PRIORITY",
        options.priority.unwrap_or(config.defaults.priority),
    );
    ctx.insert(
        "META_NAME",
        options.meta_name.as_deref().unwrap_or(&names.snake),
    );
    ctx.insert(
        "TOPIC_VAR",
        options
            .topic_name
            .clone()
            .unwrap_or_else(|| format!("topic_{}", names.snake)),
    );
    ctx.insert(
        "TOPIC_STRING",
        options
            .topic_string
            .clone()
            .unwrap_or_else(|| format!("{}_data", names.snake)),
    );
    ctx.insert("HEADER_GUARD", format!("{}_HPP", data_class.to_uppercase()));
    ctx.insert("DataClass", data_class);
    ctx
}

fn metadata_from_context(ctx: &TemplateContext) -> NodeMetadata {
    let field = |key: &str| ctx.get(key).map(str::to_string);
    NodeMetadata {
        module_name: field("MODULE_NAME"),
        node_class: field("NodeClass"),
        data_class: field("DataClass"),
        topic_var: field("TOPIC_VAR"),
        topic_string: field("TOPIC_STRING"),
        meta_name: field("META_NAME"),
        config_name: field("CONFIG_NAME"),
    }
}

fn validate_overrides(options: &ScaffoldOptions) -> Result<(), NodeError> {
    for value in [&options.data_type, &options.meta_name, &options.topic_name]
        .into_iter()
        .flatten()
    {
        validate_name(value)?;
    }
    Ok(())
}

/// Create a node module. `root` is the workspace root, `cwd` resolves a
/// relative `--output`.
pub fn scaffold_module(
    options: &ScaffoldOptions,
    root: &Path,
    cwd: &Path,
    config: &Config,
) -> Result<ScaffoldReport> {
    let target = NodeTarget::parse(&options.target);
    validate_name(&target.name)?;
    validate_overrides(options)?;

    let names = NameSet::new(&target.name);
    let module_dir = match &options.output {
        Some(output) if output.is_absolute() => output.clone(),
        Some(output) => cwd.join(output),
        None => root.join(&config.defaults.nodes_dir).join(&names.kebab),
    };

    if module_dir.exists() {
        if !options.force {
            return Err(NodeError::AlreadyExists(module_dir).into());
        }
        warn!("Overwriting existing directory: {}", module_dir.display());
        fs::remove_dir_all(&module_dir)
            .with_context(|| format!("Failed to remove {}", module_dir.display()))?;
    }

    info!("Creating node module: {}", names.kebab);
    for dir in ["", "src", "include", "zephyr"] {
        let path = module_dir.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
        debug!("Created directory: {}", path.display());
    }

    let mut ctx = build_template_context(&names, options, config);
    let mut templates = NodeTemplate::STANDARD.to_vec();
    if let Some(url) = &target.git_url {
        ctx.insert("GIT_URL", url);
        let module_path =
            relative_to_root(&module_dir, root).unwrap_or_else(|| names.kebab.clone());
        ctx.insert("MODULE_PATH", module_path);
        templates.push(NodeTemplate::NestedManifest);
    }

    let mut files = Vec::new();
    for template in templates {
        let relative = template.output_path(&ctx);
        render_to_file(template.content(), &module_dir.join(&relative), &ctx)?;
        debug!("Generated: {}", relative);
        files.push(relative);
    }

    metadata_from_context(&ctx).save(&module_dir)?;
    files.push(SIDECAR_FILE.to_string());

    let mut warnings = Vec::new();
    let manifest = if options.add_to_manifest {
        match register_in_manifest(&module_dir, &names.kebab, root, cwd, config) {
            Ok(Registration::Added(path)) => Some(path),
            Ok(Registration::Skipped(reason)) => {
                warn!("{}", reason);
                warnings.push(reason);
                None
            },
            Err(e) => {
                let reason = format!("Failed to add module to manifest: {e:#}");
                warn!("{}", reason);
                warnings.push(reason);
                None
            },
        }
    } else {
        None
    };

    let git = options.init_git.then(|| {
        let report = git::init_repository(
            &module_dir,
            target.git_url.as_deref(),
            &config.defaults.remote,
        );
        for step in &report.failed {
            warnings.push(format!("git {} failed", step));
        }
        report
    });

    Ok(ScaffoldReport {
        module_name: names.kebab,
        module_dir,
        node_class: ctx.get("NodeClass").unwrap_or_default().to_string(),
        data_class: ctx.get("DataClass").unwrap_or_default().to_string(),
        config_name: names.upper_snake,
        files,
        manifest,
        git,
        warnings,
    })
}

enum Registration {
    Added(PathBuf),
    Skipped(String),
}

fn register_in_manifest(
    module_dir: &Path,
    name: &str,
    root: &Path,
    cwd: &Path,
    config: &Config,
) -> Result<Registration> {
    let manifest_path = match find_manifest(cwd, root, &config.defaults.manifest_file) {
        Ok(path) => path,
        Err(_) => {
            return Ok(Registration::Skipped(
                "Could not find west.yml manifest, skipping auto-add".to_string(),
            ))
        },
    };

    let mut manifest = ManifestDocument::load(&manifest_path)?;
    if manifest.exists(name) {
        return Ok(Registration::Skipped(format!(
            "Module '{}' already exists in manifest",
            name
        )));
    }

    let path = relative_to_root(module_dir, root)
        .unwrap_or_else(|| module_dir.display().to_string());
    manifest.append(&ProjectEntry::new(name, path))?;
    manifest.save(&manifest_path)?;
    info!("Added module to manifest: {}", manifest_path.display());
    Ok(Registration::Added(manifest_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_target_from_url_and_name() {
        assert_eq!(
            NodeTarget::parse("https://github.com/org/imu-hub.git"),
            NodeTarget {
                name: "imu-hub".to_string(),
                git_url: Some("https://github.com/org/imu-hub.git".to_string()),
            }
        );
        assert_eq!(NodeTarget::parse("fan").git_url, None);
    }

    #[test]
    fn test_context_defaults() {
        let ctx = build_template_context(
            &NameSet::new("my-motor"),
            &ScaffoldOptions::default(),
            &Config::default(),
        );
        assert_eq!(ctx.get("MODULE_NAME"), Some("my-motor"));
        assert_eq!(ctx.get("CONFIG_NAME"), Some("MY_MOTOR"));
        assert_eq!(ctx.get("NodeClass"), Some("MyMotorNode"));
        assert_eq!(ctx.get("DataClass"), Some("MyMotorData"));
        assert_eq!(ctx.get("DESCRIPTION"), Some("my-motor node for OneFramework"));
        assert_eq!(ctx.get("STACK_SIZE"), Some("2048"));
        assert_eq!(ctx.get("PRIORITY"), Some("5"));
        assert_eq!(ctx.get("META_NAME"), Some("my_motor"));
        assert_eq!(ctx.get("TOPIC_VAR"), Some("topic_my_motor"));
        assert_eq!(ctx.get("TOPIC_STRING"), Some("my_motor_data"));
        assert_eq!(ctx.get("HEADER_GUARD"), Some("MYMOTORDATA_HPP"));
    }

    #[test]
    fn test_context_overrides() {
        let options = ScaffoldOptions {
            data_type: Some("ImuSample".to_string()),
            stack_size: Some(4096),
            topic_name: Some("imu_topic".to_string()),
            ..Default::default()
        };
        let ctx = build_template_context(&NameSet::new("imu"), &options, &Config::default());
        assert_eq!(ctx.get("DataClass"), Some("ImuSample"));
        assert_eq!(ctx.get("HEADER_GUARD"), Some("IMUSAMPLE_HPP"));
        assert_eq!(ctx.get("STACK_SIZE"), Some("4096"));
        assert_eq!(ctx.get("TOPIC_VAR"), Some("imu_topic"));
    }

    #[test]
    fn test_existing_dir_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("modules/lib/nodes/fan")).unwrap();

        let options = ScaffoldOptions {
            target: "fan".to_string(),
            ..Default::default()
        };
        let err = scaffold_module(&options, root, root, &Config::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NodeError>(),
            Some(NodeError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_invalid_override_rejected_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let options = ScaffoldOptions {
            target: "fan".to_string(),
            data_type: Some("Fan Data".to_string()),
            ..Default::default()
        };
        let err =
            scaffold_module(&options, temp_dir.path(), temp_dir.path(), &Config::default())
                .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NodeError>(),
            Some(NodeError::InvalidName { .. })
        ));
        assert!(!temp_dir.path().join("modules").exists());
    }

    #[test]
    fn test_relative_output_resolves_against_cwd() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("ws");
        let cwd = temp_dir.path().join("elsewhere");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&cwd).unwrap();

        let options = ScaffoldOptions {
            target: "fan".to_string(),
            output: Some(PathBuf::from("custom/fan")),
            ..Default::default()
        };
        let report = scaffold_module(&options, &root, &cwd, &Config::default()).unwrap();
        assert_eq!(report.module_dir, cwd.join("custom/fan"));
        assert!(cwd.join("custom/fan/src/FanNode.cpp").is_file());
    }

    #[test]
    fn test_git_url_target_writes_nested_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let options = ScaffoldOptions {
            target: "git@github.com:org/pump.git".to_string(),
            ..Default::default()
        };
        let report = scaffold_module(&options, root, root, &Config::default()).unwrap();
        assert_eq!(report.module_name, "pump");
        assert!(report.files.contains(&"west.yml".to_string()));

        let nested = fs::read_to_string(report.module_dir.join("west.yml")).unwrap();
        assert!(nested.contains("# Repository: git@github.com:org/pump.git"));
        assert!(nested.contains("path: modules/lib/nodes/pump"));
    }
}
