use crate::rename::plan::{FileChange, PathRename, RenamePlan};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyFailure {
    pub path: PathBuf,
    pub message: String,
}

/// What applying a plan actually did.
#[derive(Debug, Default, Serialize)]
pub struct ApplyReport {
    pub files_updated: Vec<PathBuf>,
    /// Planned files none of whose replacements matched
    pub files_unchanged: Vec<PathBuf>,
    pub files_missing: Vec<PathBuf>,
    pub renamed: Vec<PathRename>,
    pub failures: Vec<ApplyFailure>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, path: &Path, error: &anyhow::Error) {
        warn!("Failed to update {}: {error:#}", path.display());
        self.failures.push(ApplyFailure {
            path: path.to_path_buf(),
            message: format!("{error:#}"),
        });
    }
}

/// Replace `path`'s content via a temp file in the same directory.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension(format!("{}.onekit.tmp", std::process::id()));
    let permissions = fs::metadata(path)?.permissions();

    {
        let mut temp_file = File::create(&temp_path)
            .with_context(|| format!("Failed to create {}", temp_path.display()))?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.sync_all()?;
    }

    fs::set_permissions(&temp_path, permissions)?;
    fs::rename(&temp_path, path).with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!("Failed to atomically replace {}", path.display())
    })
}

enum EditOutcome {
    Updated,
    Unchanged,
}

fn apply_file_change(change: &FileChange) -> Result<EditOutcome> {
    let original = fs::read_to_string(&change.path)
        .with_context(|| format!("Failed to read {}", change.path.display()))?;

    let mut content = original.clone();
    for replacement in &change.replacements {
        content = content.replace(&replacement.old, &replacement.new);
    }

    if content == original {
        return Ok(EditOutcome::Unchanged);
    }
    write_atomic(&change.path, &content)?;
    Ok(EditOutcome::Updated)
}

fn perform_rename(rename: &PathRename) -> Result<()> {
    fs::rename(&rename.from, &rename.to).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            rename.from.display(),
            rename.to.display()
        )
    })
}

/// Apply `plan`: content edits, then file renames, then the directory rename.
///
/// Keeps going after a failure; nothing is rolled back. Check
/// [`ApplyReport::is_success`].
pub fn apply_rename_plan(plan: &RenamePlan) -> ApplyReport {
    let mut report = ApplyReport::default();

    for change in &plan.file_changes {
        if !change.path.exists() {
            warn!("File not found: {}", change.path.display());
            report.files_missing.push(change.path.clone());
            continue;
        }
        match apply_file_change(change) {
            Ok(EditOutcome::Updated) => {
                info!("Updated: {}", change.path.display());
                report.files_updated.push(change.path.clone());
            },
            Ok(EditOutcome::Unchanged) => report.files_unchanged.push(change.path.clone()),
            Err(e) => report.fail(&change.path, &e),
        }
    }

    for rename in plan.file_renames.iter().chain(&plan.dir_renames) {
        if !rename.from.exists() {
            warn!("Nothing to rename at {}", rename.from.display());
            continue;
        }
        if rename.to.exists() {
            let error = anyhow::anyhow!("{} already exists", rename.to.display());
            report.fail(&rename.from, &error);
            continue;
        }
        match perform_rename(rename) {
            Ok(()) => {
                info!(
                    "Renamed: {} -> {}",
                    rename.from.display(),
                    rename.to.display()
                );
                report.renamed.push(rename.clone());
            },
            Err(e) => report.fail(&rename.from, &e),
        }
    }

    report
}
