mod diff;
mod summary;
mod table;

pub use diff::render_diff;
pub use summary::render_summary;
pub use table::render_table;

use crate::rename::RenamePlan;
use std::io::{self, IsTerminal};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preview {
    #[default]
    Summary,
    Table,
    Diff,
}

impl std::str::FromStr for Preview {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "table" => Ok(Self::Table),
            "diff" => Ok(Self::Diff),
            _ => Err(format!("Invalid preview format: {}", s)),
        }
    }
}

/// Determine whether to use colors based on explicit preference or terminal detection
pub fn should_use_color_with_detector<F>(use_color: Option<bool>, is_terminal: F) -> bool
where
    F: Fn() -> bool,
{
    match use_color {
        Some(explicit_color) => explicit_color,
        None => is_terminal(),
    }
}

/// Determine whether to use colors based on explicit preference or terminal detection
pub fn should_use_color(use_color: Option<bool>) -> bool {
    should_use_color_with_detector(use_color, || io::stdout().is_terminal())
}

/// Render the plan in the specified format
pub fn render_plan(plan: &RenamePlan, format: Preview, use_color: Option<bool>) -> String {
    let use_color = should_use_color(use_color);

    match format {
        Preview::Summary => render_summary(plan),
        Preview::Table => render_table(plan, use_color),
        Preview::Diff => render_diff(plan, use_color),
    }
}

/// `path` relative to the directory holding the module, for display.
fn display_path(plan: &RenamePlan, path: &Path) -> String {
    let base = plan.module_dir.parent().unwrap_or(&plan.module_dir);
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}
