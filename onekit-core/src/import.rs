//! Adding an existing module, remote or local, to the workspace manifest.

use crate::config::Config;
use crate::descriptor::{ModuleDescriptor, ModuleYml};
use crate::error::NodeError;
use crate::git;
use crate::manifest::ManifestDocument;
use crate::naming::to_upper_snake_case;
use crate::prompt::Prompt;
use crate::workspace::{find_manifest, relative_to_root};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// A git URL or a path to a module directory
    pub source: String,
    pub name: Option<String>,
    pub remote: Option<String>,
    pub revision: Option<String>,
    pub repo_path: Option<String>,
    pub target_path: Option<String>,
    pub manifest: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ImportReport {
    pub descriptor: ModuleDescriptor,
    pub manifest: PathBuf,
    /// An entry with the same name was removed first
    pub replaced: bool,
    pub config_name: String,
    /// Declared dependencies the manifest does not list
    pub missing_dependencies: Vec<String>,
}

#[derive(Debug)]
pub enum ImportOutcome {
    Added(ImportReport),
    /// The user declined to overwrite an existing entry
    Cancelled { name: String },
}

fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Work out what the manifest entry for `options.source` should say.
pub fn resolve_descriptor(
    options: &ImportOptions,
    root: &Path,
    cwd: &Path,
    config: &Config,
) -> Result<ModuleDescriptor> {
    let descriptor = if git::is_git_url(&options.source) {
        describe_remote(options, config)
    } else {
        describe_local(options, root, cwd, config)?
    };

    if descriptor.name.is_empty() {
        return Err(NodeError::invalid_name("", "module name could not be determined").into());
    }
    Ok(descriptor)
}

fn default_path(config: &Config, name: &str) -> String {
    format!("{}/{}", config.defaults.nodes_dir.trim_end_matches('/'), name)
}

fn describe_remote(options: &ImportOptions, config: &Config) -> ModuleDescriptor {
    let url = &options.source;
    if git::parse_repo_url(url).is_none() {
        debug!("Unrecognised repository URL, naming module after its last segment");
    }
    let name = options
        .name
        .clone()
        .unwrap_or_else(|| git::repo_name_from_url(url));

    ModuleDescriptor {
        path: options
            .target_path
            .clone()
            .unwrap_or_else(|| default_path(config, &name)),
        url: Some(url.clone()),
        remote: options.remote.clone(),
        revision: Some(
            options
                .revision
                .clone()
                .unwrap_or_else(|| config.defaults.revision.clone()),
        ),
        repo_path: options.repo_path.clone(),
        dependencies: Vec::new(),
        name,
    }
}

fn describe_local(
    options: &ImportOptions,
    root: &Path,
    cwd: &Path,
    config: &Config,
) -> Result<ModuleDescriptor> {
    let module_dir = resolve_path(Path::new(&options.source), cwd);
    if !module_dir.is_dir() {
        return Err(NodeError::not_found("module directory", module_dir).into());
    }

    let (descriptor_path, module_yml) = ModuleYml::load_from_module(&module_dir)?;
    debug!("Read module descriptor {}", descriptor_path.display());

    let dir_name = module_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = options
        .name
        .clone()
        .or(module_yml.name)
        .unwrap_or(dir_name);

    let path = options
        .target_path
        .clone()
        .or_else(|| relative_to_root(&module_dir, root))
        .unwrap_or_else(|| default_path(config, &name));

    Ok(ModuleDescriptor {
        name,
        path,
        url: None,
        remote: options.remote.clone(),
        revision: options.revision.clone(),
        repo_path: options.repo_path.clone(),
        dependencies: module_yml.dependencies,
    })
}

/// Add the module to the manifest, asking before replacing an entry with the
/// same name.
pub fn import_module(
    options: &ImportOptions,
    root: &Path,
    cwd: &Path,
    config: &Config,
    prompt: &mut dyn Prompt,
) -> Result<ImportOutcome> {
    let descriptor = resolve_descriptor(options, root, cwd, config)?;

    let manifest_path = match &options.manifest {
        Some(path) => {
            let path = resolve_path(path, cwd);
            if !path.is_file() {
                return Err(NodeError::not_found("manifest", path).into());
            }
            path
        },
        None => find_manifest(cwd, root, &config.defaults.manifest_file)?,
    };

    let mut manifest = ManifestDocument::load(&manifest_path)?;

    let replaced = manifest.exists(&descriptor.name);
    if replaced {
        warn!("Module '{}' already exists in manifest", descriptor.name);
        if !prompt.confirm("Overwrite? [y/N]: ")? {
            info!("Cancelled");
            return Ok(ImportOutcome::Cancelled {
                name: descriptor.name,
            });
        }
        manifest.remove(&descriptor.name)?;
    }

    let known = manifest.project_names();
    let missing_dependencies: Vec<String> = descriptor
        .dependencies
        .iter()
        .filter(|dep| !known.contains(dep))
        .cloned()
        .collect();
    for dep in &missing_dependencies {
        warn!(
            "Module '{}' depends on '{}', which is not in the manifest",
            descriptor.name, dep
        );
    }

    manifest.append(&descriptor.to_project_entry())?;
    manifest.save(&manifest_path)?;
    info!("Added project: {}", descriptor.name);

    Ok(ImportOutcome::Added(ImportReport {
        config_name: to_upper_snake_case(&descriptor.name),
        descriptor,
        manifest: manifest_path,
        replaced,
        missing_dependencies,
    }))
}
