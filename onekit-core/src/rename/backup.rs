use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// `<parent>/<dirname>_backup_<YYYYmmdd_HHMMSS>` for `module_dir` at `now`.
pub fn backup_path_for(module_dir: &Path, now: DateTime<Local>) -> Result<PathBuf> {
    let name = module_dir
        .file_name()
        .ok_or_else(|| anyhow!("Cannot back up {}", module_dir.display()))?;
    let parent = module_dir.parent().unwrap_or_else(|| Path::new("."));
    Ok(parent.join(format!(
        "{}_backup_{}",
        name.to_string_lossy(),
        now.format("%Y%m%d_%H%M%S")
    )))
}

/// Copy the whole module next to itself. Returns the backup directory.
pub fn create_backup(module_dir: &Path) -> Result<PathBuf> {
    let backup_dir = backup_path_for(module_dir, Local::now())?;
    if backup_dir.exists() {
        return Err(anyhow!("Backup already exists: {}", backup_dir.display()));
    }

    copy_tree(module_dir, &backup_dir)
        .with_context(|| format!("Failed to back up {}", module_dir.display()))?;
    debug!("Backed up {} to {}", module_dir.display(), backup_dir.display());
    Ok(backup_dir)
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(from)?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_backup_name() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let path = backup_path_for(Path::new("/ws/nodes/motor"), now).unwrap();
        assert_eq!(path, PathBuf::from("/ws/nodes/motor_backup_20240309_140507"));
    }

    #[test]
    fn test_backup_copies_everything() {
        let temp_dir = TempDir::new().unwrap();
        let module = temp_dir.path().join("motor");
        fs::create_dir_all(module.join("src")).unwrap();
        fs::create_dir_all(module.join("empty")).unwrap();
        fs::write(module.join("src/MotorNode.cpp"), "class MotorNode").unwrap();
        fs::write(module.join("CMakeLists.txt"), "cmake").unwrap();

        let backup = create_backup(&module).unwrap();
        assert_eq!(backup.parent(), Some(temp_dir.path()));
        assert!(backup
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("motor_backup_"));
        assert_eq!(
            fs::read_to_string(backup.join("src/MotorNode.cpp")).unwrap(),
            "class MotorNode"
        );
        assert!(backup.join("CMakeLists.txt").is_file());
        assert!(backup.join("empty").is_dir());
    }
}
