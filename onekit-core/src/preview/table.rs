use super::display_path;
use crate::rename::RenamePlan;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use std::io::{self, IsTerminal};

/// Render plan as a table of files and paths
pub fn render_table(plan: &RenamePlan, use_color: bool) -> String {
    let mut table = Table::new();

    if io::stdout().is_terminal() {
        table.set_content_arrangement(ContentArrangement::Dynamic);
    } else {
        table.set_content_arrangement(ContentArrangement::Disabled);
    }

    // Force styling even in non-TTY environments when colors are explicitly requested
    if use_color {
        table.enforce_styling();
        table.set_header(vec![
            Cell::new("Path").fg(Color::Cyan),
            Cell::new("Kind").fg(Color::Cyan),
            Cell::new("Change").fg(Color::Cyan),
        ]);
    } else {
        table.set_header(vec!["Path", "Kind", "Change"]);
    }

    for change in &plan.file_changes {
        let path = display_path(plan, &change.path);
        let replacements = change
            .replacements
            .iter()
            .map(|r| format!("{} → {}", r.old.trim(), r.new.trim()))
            .collect::<Vec<_>>()
            .join("\n");

        if use_color {
            table.add_row(vec![
                Cell::new(&path),
                Cell::new("Content").fg(Color::Green),
                Cell::new(&replacements),
            ]);
        } else {
            table.add_row(vec![path.as_str(), "Content", replacements.as_str()]);
        }
    }

    let renames = plan
        .file_renames
        .iter()
        .map(|r| ("File", r))
        .chain(plan.dir_renames.iter().map(|r| ("Dir", r)));
    for (kind, rename) in renames {
        let from = display_path(plan, &rename.from);
        let to = format!("→ {}", display_path(plan, &rename.to));

        if use_color {
            table.add_row(vec![
                Cell::new(&from),
                Cell::new(kind).fg(Color::Blue),
                Cell::new(&to).fg(Color::Magenta),
            ]);
        } else {
            table.add_row(vec![from.as_str(), kind, to.as_str()]);
        }
    }

    let totals = format!(
        "{} files, {} replacements, {} paths",
        plan.file_changes.len(),
        plan.replacement_count(),
        plan.file_renames.len() + plan.dir_renames.len()
    );
    if use_color {
        table.add_row(vec![
            Cell::new("TOTALS").fg(Color::Cyan),
            Cell::new(""),
            Cell::new(&totals).fg(Color::Yellow),
        ]);
    } else {
        table.add_row(vec!["TOTALS", "", totals.as_str()]);
    }

    table.to_string()
}
