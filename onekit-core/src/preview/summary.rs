use super::display_path;
use crate::rename::RenamePlan;
use std::fmt::Write;

/// Render plan as a plain-text summary
pub fn render_summary(plan: &RenamePlan) -> String {
    let mut output = String::new();

    writeln!(output, "[RENAME PLAN]").unwrap();
    writeln!(output, "Type: {}", plan.kind).unwrap();
    writeln!(output, "Old name: {}", plan.old_name).unwrap();
    if plan.new_identifier == plan.new_name {
        writeln!(output, "New name: {}", plan.new_name).unwrap();
    } else {
        writeln!(output, "New name: {} ({})", plan.new_name, plan.new_identifier).unwrap();
    }
    writeln!(output, "Files: {}", plan.file_changes.len()).unwrap();
    writeln!(output, "Replacements: {}", plan.replacement_count()).unwrap();
    writeln!(
        output,
        "Paths: {}",
        plan.file_renames.len() + plan.dir_renames.len()
    )
    .unwrap();

    if !plan.file_changes.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "[CONTENT]").unwrap();
        for change in &plan.file_changes {
            writeln!(output, "{}:", display_path(plan, &change.path)).unwrap();
            for replacement in &change.replacements {
                writeln!(
                    output,
                    "  '{}' -> '{}'",
                    replacement.old.replace('\n', "\\n"),
                    replacement.new.replace('\n', "\\n")
                )
                .unwrap();
            }
        }
    }

    if !plan.file_renames.is_empty() || !plan.dir_renames.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "[PATHS]").unwrap();
        for rename in &plan.file_renames {
            writeln!(
                output,
                "file: {} -> {}",
                display_path(plan, &rename.from),
                display_path(plan, &rename.to)
            )
            .unwrap();
        }
        // The directory rename always runs last.
        for rename in &plan.dir_renames {
            writeln!(
                output,
                "dir: {} -> {}",
                display_path(plan, &rename.from),
                display_path(plan, &rename.to)
            )
            .unwrap();
        }
    }

    output
}
