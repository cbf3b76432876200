use super::display_path;
use crate::rename::{FileChange, RenamePlan};
use nu_ansi_term::{Color as AnsiColor, Style};
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;
use std::fs;

/// The file's content after the change, or `None` when it cannot be read.
fn preview_content(change: &FileChange) -> Option<(String, String)> {
    let before = fs::read_to_string(&change.path).ok()?;
    let mut after = before.clone();
    for replacement in &change.replacements {
        after = after.replace(&replacement.old, &replacement.new);
    }
    Some((before, after))
}

fn write_header(output: &mut String, file_str: &str, use_color: bool) {
    if use_color {
        write!(
            output,
            "{}",
            Style::new()
                .fg(AnsiColor::White)
                .bold()
                .paint(format!("--- {}\n+++ {}\n", file_str, file_str))
        )
        .unwrap();
    } else {
        write!(output, "--- {}\n+++ {}\n", file_str, file_str).unwrap();
    }
}

/// Render plan as unified diffs of the files it would edit
pub fn render_diff(plan: &RenamePlan, use_color: bool) -> String {
    let mut output = String::new();

    for change in &plan.file_changes {
        let file_str = display_path(plan, &change.path);
        let Some((before, after)) = preview_content(change) else {
            writeln!(output, "--- {} (missing, will be skipped)", file_str).unwrap();
            continue;
        };
        if before == after {
            continue;
        }

        write_header(&mut output, &file_str, use_color);

        let diff = TextDiff::from_lines(&before, &after);
        for group in diff.grouped_ops(1) {
            let Some(first) = group.first() else {
                continue;
            };
            let line_num = first.old_range().start + 1;
            if use_color {
                write!(
                    output,
                    "{}",
                    AnsiColor::Blue.paint(format!("@@ line {} @@\n", line_num))
                )
                .unwrap();
            } else {
                writeln!(output, "@@ line {} @@", line_num).unwrap();
            }

            for op in &group {
                for line_change in diff.iter_changes(op) {
                    let sign = match line_change.tag() {
                        ChangeTag::Delete => "-",
                        ChangeTag::Insert => "+",
                        ChangeTag::Equal => " ",
                    };
                    let text = line_change.to_string();
                    let text = text.trim_end_matches('\n');

                    if use_color {
                        let line = match line_change.tag() {
                            ChangeTag::Delete => AnsiColor::Red.paint(format!("{sign}{text}")),
                            ChangeTag::Insert => AnsiColor::Green.paint(format!("{sign}{text}")),
                            ChangeTag::Equal => Style::new().paint(format!("{sign}{text}")),
                        };
                        writeln!(output, "{}", line).unwrap();
                    } else {
                        writeln!(output, "{}{}", sign, text).unwrap();
                    }
                }
            }
            output.push('\n');
        }
    }

    if !plan.file_renames.is_empty() || !plan.dir_renames.is_empty() {
        if use_color {
            write!(
                output,
                "\n{}\n",
                AnsiColor::Cyan.bold().paint("=== RENAMES ===")
            )
            .unwrap();
        } else {
            output.push_str("\n=== RENAMES ===\n");
        }

        let renames = plan
            .file_renames
            .iter()
            .map(|r| ("file", r))
            .chain(plan.dir_renames.iter().map(|r| ("dir", r)));
        for (kind, rename) in renames {
            let from = display_path(plan, &rename.from);
            let to = display_path(plan, &rename.to);
            if use_color {
                writeln!(
                    output,
                    "{} {} {} {}",
                    AnsiColor::Yellow.paint(kind),
                    AnsiColor::Red.paint(from),
                    AnsiColor::White.paint("→"),
                    AnsiColor::Green.paint(to)
                )
                .unwrap();
            } else {
                writeln!(output, "{} {} → {}", kind, from, to).unwrap();
            }
        }
    }

    output
}
