use crate::descriptor::NodeMetadata;
use crate::error::NodeError;
use crate::naming::{to_kebab_case, to_pascal_case, to_snake_case, to_upper_snake_case, validate_name};
use crate::rename::inspect::{source_files, ModuleInfo};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which part of a module a rename targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenameKind {
    Class,
    Module,
    Topic,
    MetaName,
}

impl RenameKind {
    /// In the order the interactive menu lists them.
    pub const ALL: [Self; 4] = [Self::Class, Self::Module, Self::Topic, Self::MetaName];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Module => "module",
            Self::Topic => "topic",
            Self::MetaName => "meta-name",
        }
    }
}

impl fmt::Display for RenameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub old: String,
    pub new: String,
}

impl Replacement {
    fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Literal substitutions for one file, applied in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: PathBuf,
    pub replacements: Vec<Replacement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathRename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Every change one rename makes. Paths are those before any rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    pub kind: RenameKind,
    pub module_dir: PathBuf,
    pub old_name: String,
    /// The name as the user gave it
    pub new_name: String,
    /// The identifier written into the files, e.g. `FanNode` for `fan`
    pub new_identifier: String,
    pub file_changes: Vec<FileChange>,
    pub file_renames: Vec<PathRename>,
    /// At most one: the module directory itself
    pub dir_renames: Vec<PathRename>,
}

impl RenamePlan {
    pub fn replacement_count(&self) -> usize {
        self.file_changes.iter().map(|c| c.replacements.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.file_changes.is_empty() && self.file_renames.is_empty() && self.dir_renames.is_empty()
    }
}

fn class_name_for(new_name: &str) -> String {
    let pascal = to_pascal_case(new_name);
    if pascal.ends_with("Node") {
        pascal
    } else {
        format!("{pascal}Node")
    }
}

fn same_replacements_for_sources(module_dir: &Path, replacements: &[Replacement]) -> Vec<FileChange> {
    source_files(module_dir)
        .into_iter()
        .map(|path| FileChange {
            path,
            replacements: replacements.to_vec(),
        })
        .collect()
}

/// Work out every edit and rename for changing one name of the module.
///
/// `old_name` overrides the inspected name; without either the rename cannot
/// be planned.
pub fn build_rename_plan(
    module_dir: &Path,
    info: &ModuleInfo,
    kind: RenameKind,
    old_name: Option<&str>,
    new_name: &str,
) -> Result<RenamePlan> {
    validate_name(new_name)?;

    let old_name = old_name
        .or_else(|| info.current_name(kind))
        .map(str::to_string)
        .ok_or_else(|| NodeError::UnknownCurrentName {
            kind: kind.to_string(),
        })?;

    let mut file_changes = Vec::new();
    let mut file_renames = Vec::new();
    let mut dir_renames = Vec::new();
    let mut sidecar = Vec::new();

    let new_identifier = match kind {
        RenameKind::Class => {
            let new_class = class_name_for(new_name);
            let replacements = [
                Replacement::new(format!("class {old_name}"), format!("class {new_class}")),
                Replacement::new(format!("Node<{old_name}>"), format!("Node<{new_class}>")),
                Replacement::new(
                    format!("ONE_NODE_REGISTER({old_name})"),
                    format!("ONE_NODE_REGISTER({new_class})"),
                ),
            ];
            file_changes.extend(same_replacements_for_sources(module_dir, &replacements));

            let old_src = module_dir.join("src").join(format!("{old_name}.cpp"));
            if old_src.exists() {
                file_renames.push(PathRename {
                    from: old_src,
                    to: module_dir.join("src").join(format!("{new_class}.cpp")),
                });

                let cmake = module_dir.join("CMakeLists.txt");
                if cmake.exists() {
                    file_changes.push(FileChange {
                        path: cmake,
                        replacements: vec![Replacement::new(
                            format!("src/{old_name}.cpp"),
                            format!("src/{new_class}.cpp"),
                        )],
                    });
                }
            }

            sidecar.push(Replacement::new(
                format!("node_class: {old_name}"),
                format!("node_class: {new_class}"),
            ));
            new_class
        },
        RenameKind::Module => {
            let new_kebab = to_kebab_case(new_name);
            let new_upper = to_upper_snake_case(new_name);
            let old_config = info
                .config_name
                .clone()
                .unwrap_or_else(|| to_upper_snake_case(&old_name));
            let description = Replacement::new(
                format!("{} node for OneFramework", to_kebab_case(&old_name)),
                format!("{new_kebab} node for OneFramework"),
            );

            let module_yml = module_dir.join("zephyr").join("module.yml");
            if module_yml.exists() {
                file_changes.push(FileChange {
                    path: module_yml,
                    replacements: vec![Replacement::new(
                        format!("name: {old_name}"),
                        format!("name: {new_kebab}"),
                    )],
                });
            }

            let kconfig = module_dir.join("zephyr").join("Kconfig");
            if kconfig.exists() {
                file_changes.push(FileChange {
                    path: kconfig,
                    replacements: vec![
                        Replacement::new(format!("config {old_config}"), format!("config {new_upper}")),
                        Replacement::new(format!("\nif {old_config}\n"), format!("\nif {new_upper}\n")),
                        Replacement::new(format!("module = {old_config}"), format!("module = {new_upper}")),
                        Replacement::new(
                            format!("module-str = {old_config}"),
                            format!("module-str = {new_upper}"),
                        ),
                        Replacement::new(format!("endif # {old_config}"), format!("endif # {new_upper}")),
                        description.clone(),
                        Replacement::new(
                            format!("Enable the {old_name} node."),
                            format!("Enable the {new_kebab} node."),
                        ),
                    ],
                });
            }

            let cmake = module_dir.join("CMakeLists.txt");
            if cmake.exists() {
                file_changes.push(FileChange {
                    path: cmake,
                    replacements: vec![
                        Replacement::new(format!("CONFIG_{old_config}"), format!("CONFIG_{new_upper}")),
                        description,
                    ],
                });
            }

            sidecar.push(Replacement::new(
                format!("module_name: {old_name}"),
                format!("module_name: {new_kebab}"),
            ));
            sidecar.push(Replacement::new(
                format!("config_name: {old_config}"),
                format!("config_name: {new_upper}"),
            ));

            if let Some(parent) = module_dir.parent() {
                let new_dir = parent.join(&new_kebab);
                if new_dir != module_dir {
                    dir_renames.push(PathRename {
                        from: module_dir.to_path_buf(),
                        to: new_dir,
                    });
                }
            }
            new_kebab
        },
        RenameKind::Topic => {
            let new_var = format!("topic_{}", to_snake_case(new_name));
            let replacements = [
                Replacement::new(format!(", {old_name},"), format!(", {new_var},")),
                Replacement::new(format!("{old_name}.write("), format!("{new_var}.write(")),
                Replacement::new(format!("{old_name}.read("), format!("{new_var}.read(")),
                Replacement::new(format!("{old_name}.try_read("), format!("{new_var}.try_read(")),
            ];
            file_changes.extend(same_replacements_for_sources(module_dir, &replacements));

            sidecar.push(Replacement::new(
                format!("topic_var: {old_name}"),
                format!("topic_var: {new_var}"),
            ));
            new_var
        },
        RenameKind::MetaName => {
            let new_meta = to_snake_case(new_name);
            let replacements = [Replacement::new(
                format!("name = \"{old_name}\""),
                format!("name = \"{new_meta}\""),
            )];
            file_changes.extend(same_replacements_for_sources(module_dir, &replacements));

            sidecar.push(Replacement::new(
                format!("meta_name: {old_name}"),
                format!("meta_name: {new_meta}"),
            ));
            new_meta
        },
    };

    let sidecar_path = NodeMetadata::path(module_dir);
    if sidecar_path.is_file() {
        file_changes.push(FileChange {
            path: sidecar_path,
            replacements: sidecar,
        });
    }

    Ok(RenamePlan {
        kind,
        module_dir: module_dir.to_path_buf(),
        old_name,
        new_name: new_name.to_string(),
        new_identifier,
        file_changes,
        file_renames,
        dir_renames,
    })
}
