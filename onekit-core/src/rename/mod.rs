//! Renaming one part of a node module: inspect, plan, back up, apply.

pub mod apply;
pub mod backup;
pub mod inspect;
pub mod plan;

pub use apply::{apply_rename_plan, ApplyFailure, ApplyReport};
pub use backup::create_backup;
pub use inspect::{inspect_module, ModuleInfo};
pub use plan::{build_rename_plan, FileChange, PathRename, RenameKind, RenamePlan, Replacement};
