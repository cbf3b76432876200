//! High-level operations that correspond to CLI commands
//!
//! These modules resolve the workspace, load configuration and drive the
//! core modules, separated from CLI concerns like argument parsing and
//! output formatting.

pub mod add;
pub mod create;
pub mod rename;

// Re-export the main operation functions for easy access
pub use add::add_node_operation;
pub use create::create_node_operation;
pub use rename::{rename_node_operation, RenameNodeOptions};
