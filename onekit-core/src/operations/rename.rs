use crate::config::Config;
use crate::error::NodeError;
use crate::output::RenameResult;
use crate::preview::{render_plan, Preview};
use crate::prompt::Prompt;
use crate::rename::{
    apply_rename_plan, build_rename_plan, create_backup, inspect_module, ModuleInfo, RenameKind,
};
use crate::workspace::RootResolver;
use anyhow::{anyhow, Context, Result};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What `rename-node` was asked to do.
#[derive(Debug, Clone, Default)]
pub struct RenameNodeOptions {
    /// Module directory; the current directory when absent
    pub path: Option<PathBuf>,
    pub non_interactive: bool,
    pub kind: Option<RenameKind>,
    pub new_name: Option<String>,
    pub old_name: Option<String>,
    pub dry_run: bool,
    pub no_backup: bool,
    /// Skip the confirmation prompt
    pub yes: bool,
    /// `None` renders no preview at all (JSON output)
    pub preview: Option<Preview>,
    pub use_color: Option<bool>,
}

fn menu() -> String {
    let mut menu = String::from("\nWhat would you like to rename?\n");
    for (index, kind) in RenameKind::ALL.iter().enumerate() {
        writeln!(menu, "  {}. {}", index + 1, kind).unwrap();
    }
    menu.push_str("  0. Cancel");
    menu
}

fn parse_choice(choice: &str) -> Result<Option<RenameKind>> {
    if choice == "0" {
        return Ok(None);
    }
    choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| RenameKind::ALL.get(index).copied())
        .map(Some)
        .ok_or_else(|| NodeError::invalid_name(choice, "expected a choice from 0 to 4").into())
}

/// Ask for whatever the options leave open. `None` means the user cancelled.
fn ask_interactively(
    options: &RenameNodeOptions,
    info: &ModuleInfo,
    prompt: &mut dyn Prompt,
) -> Result<Option<(RenameKind, String)>> {
    let kind = match options.kind {
        Some(kind) => kind,
        None => {
            prompt.show(&menu())?;
            let choice = prompt.input("Enter your choice (0-4): ")?;
            match parse_choice(&choice)? {
                Some(kind) => kind,
                None => return Ok(None),
            }
        },
    };

    let new_name = match &options.new_name {
        Some(name) => name.clone(),
        None => {
            let current = options
                .old_name
                .as_deref()
                .or_else(|| info.current_name(kind))
                .unwrap_or("N/A");
            let name = prompt.input(&format!("Enter new {kind} name (current: {current}): "))?;
            if name.is_empty() {
                info!("No name provided");
                return Ok(None);
            }
            name
        },
    };

    Ok(Some((kind, new_name)))
}

fn resolve_module_dir(path: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    let dir = match path {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => cwd.join(path),
        None => cwd.to_path_buf(),
    };
    if !dir.is_dir() {
        return Err(NodeError::not_found("module path", dir).into());
    }
    dir.canonicalize()
        .with_context(|| format!("Failed to resolve {}", dir.display()))
}

/// Rename-node operation - returns structured data plus the text to print.
///
/// Interactive runs show the module info, menu and preview through `prompt`
/// as they happen. Non-interactive runs hand that text back instead.
pub fn rename_node_operation(
    options: &RenameNodeOptions,
    resolver: &dyn RootResolver,
    cwd: &Path,
    prompt: &mut dyn Prompt,
) -> Result<(RenameResult, Option<String>)> {
    let root = resolver.resolve_root();
    let config = Config::load(&root)?;

    let module_dir = resolve_module_dir(options.path.as_deref(), cwd)?;
    let info = inspect_module(&module_dir)?;
    let interactive = !options.non_interactive;

    let mut text = String::new();
    if options.preview.is_some() {
        if interactive {
            prompt.show(&info.to_string())?;
        } else {
            writeln!(text, "{info}").unwrap();
        }
    }

    let (kind, new_name) = if interactive {
        match ask_interactively(options, &info, prompt)? {
            Some(answer) => answer,
            None => return Ok((RenameResult::cancelled(module_dir), None)),
        }
    } else {
        let kind = options
            .kind
            .ok_or_else(|| anyhow!("--type is required with --non-interactive"))?;
        let new_name = options
            .new_name
            .clone()
            .ok_or_else(|| anyhow!("--new-name is required with --non-interactive"))?;
        (kind, new_name)
    };

    let plan = build_rename_plan(
        &module_dir,
        &info,
        kind,
        options.old_name.as_deref(),
        &new_name,
    )?;

    if let Some(format) = options.preview {
        let preview = render_plan(&plan, format, options.use_color);
        if interactive {
            prompt.show(&preview)?;
        } else {
            text.push_str(&preview);
        }
    }
    let text = (!text.is_empty()).then_some(text);

    let mut result = RenameResult {
        kind: Some(kind),
        module_dir: module_dir.clone(),
        old_name: Some(plan.old_name.clone()),
        new_name: Some(plan.new_name.clone()),
        new_identifier: Some(plan.new_identifier.clone()),
        dry_run: options.dry_run,
        cancelled: false,
        backup: None,
        new_module_dir: None,
        plan: None,
        report: None,
    };

    if options.dry_run {
        result.plan = Some(plan);
        return Ok((result, text));
    }

    if plan.is_empty() {
        warn!("Nothing to rename in {}", module_dir.display());
        result.plan = Some(plan);
        return Ok((result, text));
    }

    if interactive && !options.yes && !prompt.confirm("\nProceed with rename? [y/N]: ")? {
        info!("Rename cancelled");
        return Ok((RenameResult::cancelled(module_dir), text));
    }

    if options.no_backup || !config.defaults.backup {
        warn!("Skipping backup of {}", module_dir.display());
    } else {
        let backup = create_backup(&module_dir)
            .context("Backup failed; no changes were made")?;
        info!("Created backup: {}", backup.display());
        result.backup = Some(backup);
    }

    let report = apply_rename_plan(&plan);
    result.new_module_dir = plan
        .dir_renames
        .iter()
        .find(|rename| report.renamed.contains(rename))
        .map(|rename| rename.to.clone());
    result.plan = Some(plan);
    result.report = Some(report);

    Ok((result, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormatter;
    use crate::prompt::ReaderPrompt;
    use crate::scaffold::{scaffold_module, ScaffoldOptions};
    use crate::workspace::FixedRoot;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn scaffold(root: &Path, name: &str) -> PathBuf {
        let options = ScaffoldOptions {
            target: name.to_string(),
            ..Default::default()
        };
        scaffold_module(&options, root, root, &Config::default())
            .unwrap()
            .module_dir
    }

    fn scripted(answers: &str) -> ReaderPrompt<Cursor<String>, Vec<u8>> {
        ReaderPrompt::new(Cursor::new(answers.to_string()), Vec::new())
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("0").unwrap(), None);
        assert_eq!(parse_choice("1").unwrap(), Some(RenameKind::Class));
        assert_eq!(parse_choice("4").unwrap(), Some(RenameKind::MetaName));
        assert!(parse_choice("5").is_err());
        assert!(parse_choice("class").is_err());
    }

    #[test]
    fn test_interactive_class_rename() {
        let temp_dir = TempDir::new().unwrap();
        let module_dir = scaffold(temp_dir.path(), "motor");

        let options = RenameNodeOptions {
            path: Some(module_dir),
            preview: Some(Preview::Summary),
            use_color: Some(false),
            ..Default::default()
        };
        let mut prompt = scripted("1\nfan\ny\n");
        let (result, text) = rename_node_operation(
            &options,
            &FixedRoot(temp_dir.path().to_path_buf()),
            temp_dir.path(),
            &mut prompt,
        )
        .unwrap();

        assert!(text.is_none());
        assert!(result.is_success());
        assert_eq!(result.new_identifier.as_deref(), Some("FanNode"));
        assert!(result.backup.as_ref().unwrap().is_dir());
        assert!(result.module_dir.join("src/FanNode.cpp").is_file());
    }

    #[test]
    fn test_menu_cancel_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let module_dir = scaffold(temp_dir.path(), "motor");

        let options = RenameNodeOptions {
            path: Some(module_dir.clone()),
            preview: Some(Preview::Summary),
            ..Default::default()
        };
        let (result, _) = rename_node_operation(
            &options,
            &FixedRoot(temp_dir.path().to_path_buf()),
            temp_dir.path(),
            &mut scripted("0\n"),
        )
        .unwrap();

        assert!(result.cancelled);
        assert!(module_dir.join("src/MotorNode.cpp").is_file());
    }

    #[test]
    fn test_declined_confirmation_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let module_dir = scaffold(temp_dir.path(), "motor");
        let source = module_dir.join("src/MotorNode.cpp");
        let before = fs::read_to_string(&source).unwrap();

        let options = RenameNodeOptions {
            path: Some(module_dir.clone()),
            kind: Some(RenameKind::MetaName),
            new_name: Some("fan".to_string()),
            preview: Some(Preview::Summary),
            ..Default::default()
        };
        let (result, _) = rename_node_operation(
            &options,
            &FixedRoot(temp_dir.path().to_path_buf()),
            temp_dir.path(),
            &mut scripted("\n"),
        )
        .unwrap();

        assert!(result.cancelled);
        assert_eq!(fs::read_to_string(&source).unwrap(), before);
        assert_eq!(fs::read_dir(module_dir.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_non_interactive_requires_type() {
        let temp_dir = TempDir::new().unwrap();
        let module_dir = scaffold(temp_dir.path(), "motor");

        let options = RenameNodeOptions {
            path: Some(module_dir),
            non_interactive: true,
            new_name: Some("fan".to_string()),
            ..Default::default()
        };
        let err = rename_node_operation(
            &options,
            &FixedRoot(temp_dir.path().to_path_buf()),
            temp_dir.path(),
            &mut scripted(""),
        )
        .unwrap_err();
        assert!(err.to_string().contains("--type"));
    }

    #[test]
    fn test_missing_module_path() {
        let temp_dir = TempDir::new().unwrap();
        let options = RenameNodeOptions {
            path: Some(PathBuf::from("nope")),
            non_interactive: true,
            ..Default::default()
        };
        let err = rename_node_operation(
            &options,
            &FixedRoot(temp_dir.path().to_path_buf()),
            temp_dir.path(),
            &mut scripted(""),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NodeError>(),
            Some(NodeError::NotFound { .. })
        ));
    }

    #[test]
    fn test_module_rename_reports_new_dir() {
        let temp_dir = TempDir::new().unwrap();
        let module_dir = scaffold(temp_dir.path(), "motor");

        let options = RenameNodeOptions {
            path: Some(module_dir),
            non_interactive: true,
            kind: Some(RenameKind::Module),
            new_name: Some("fan-speed".to_string()),
            no_backup: true,
            preview: Some(Preview::Summary),
            use_color: Some(false),
            ..Default::default()
        };
        let (result, text) = rename_node_operation(
            &options,
            &FixedRoot(temp_dir.path().to_path_buf()),
            temp_dir.path(),
            &mut scripted(""),
        )
        .unwrap();

        let text = text.unwrap();
        assert!(text.contains("Current module information:"));
        assert!(text.contains("[RENAME PLAN]"));
        let new_dir = result.new_module_dir.clone().unwrap();
        assert!(new_dir.ends_with("fan-speed"));
        assert!(new_dir.join("zephyr/Kconfig").is_file());
        assert!(result.backup.is_none());
    }

    #[test]
    fn test_empty_plan_reports_nothing_to_rename() {
        let temp_dir = TempDir::new().unwrap();
        let module_dir = temp_dir.path().join("bare");
        fs::create_dir_all(&module_dir).unwrap();

        let options = RenameNodeOptions {
            path: Some(module_dir.clone()),
            non_interactive: true,
            kind: Some(RenameKind::MetaName),
            old_name: Some("bare".to_string()),
            new_name: Some("fan".to_string()),
            ..Default::default()
        };
        let (result, _) = rename_node_operation(
            &options,
            &FixedRoot(temp_dir.path().to_path_buf()),
            temp_dir.path(),
            &mut scripted(""),
        )
        .unwrap();

        assert!(result.report.is_none());
        assert!(result.backup.is_none());
        assert_eq!(result.format_summary(), "Nothing to rename\n");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}
