#![allow(unused)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod descriptor;
pub mod error;
pub mod git;
pub mod import;
pub mod manifest;
pub mod naming;
pub mod operations;
pub mod output;
pub mod preview;
pub mod prompt;
pub mod rename;
pub mod scaffold;
pub mod template;
pub mod workspace;

pub use config::Config;
pub use descriptor::{ModuleDescriptor, ModuleYml, NodeMetadata};
pub use error::NodeError;
pub use import::{import_module, ImportOptions, ImportOutcome, ImportReport};
pub use manifest::{ManifestDocument, ProjectEntry};
pub use naming::{
    to_kebab_case, to_pascal_case, to_snake_case, to_upper_snake_case, validate_name, NameSet,
};
pub use operations::{
    add_node_operation, create_node_operation, rename_node_operation, RenameNodeOptions,
};
pub use output::{AddResult, CreateResult, OutputFormat, OutputFormatter, RenameResult};
pub use preview::{render_plan, Preview};
pub use prompt::{AssumeYes, Prompt, ReaderPrompt};
pub use rename::{
    apply_rename_plan, build_rename_plan, create_backup, inspect_module, ApplyReport, ModuleInfo,
    RenameKind, RenamePlan,
};
pub use scaffold::{scaffold_module, ScaffoldOptions, ScaffoldReport};
pub use workspace::{FixedRoot, RootResolver, WestWorkspace};
