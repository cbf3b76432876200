use anyhow::Context;
use clap::Parser;
use onekit_core::{
    ImportOptions, NodeError, OutputFormat, ReaderPrompt, RenameNodeOptions, ScaffoldOptions,
};
use std::io::{self, StdinLock, Write};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod add;
mod cli;
mod create;
mod rename;

use cli::{Cli, Commands};

/// Questions go to stdout, except in JSON mode where stdout carries the result.
pub type TerminalPrompt = ReaderPrompt<StdinLock<'static>, Box<dyn Write>>;

pub fn terminal_prompt(output: OutputFormat) -> TerminalPrompt {
    let out: Box<dyn Write> = match output {
        OutputFormat::Json => Box::new(io::stderr()),
        OutputFormat::Summary => Box::new(io::stdout()),
    };
    ReaderPrompt::new(io::stdin().lock(), out)
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

/// 1 for conflicts and partial failures, 2 for bad input, 3 for anything else.
fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<NodeError>() {
        Some(NodeError::AlreadyExists(_) | NodeError::PartialApplyFailure { .. }) => 1,
        Some(e) if e.is_invalid_input() => 2,
        _ => 3,
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Handle -C directory flag
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Failed to change to directory: {}", dir.display()))
            .unwrap_or_else(|e| {
                eprintln!("Error: {e:#}");
                process::exit(2);
            });
        debug!("Running in {}", dir.display());
    }

    let output: OutputFormat = cli.format.into();
    let use_color = cli.no_color.then_some(false);

    let result = match cli.command {
        Commands::CreateNode {
            target,
            output_dir,
            data_type,
            stack_size,
            priority,
            meta_name,
            topic_name,
            topic_string,
            force,
            add_to_manifest,
            init_git,
        } => create::handle_create(
            &ScaffoldOptions {
                target,
                output: output_dir,
                data_type,
                stack_size,
                priority,
                meta_name,
                topic_name,
                topic_string,
                force,
                add_to_manifest,
                init_git,
            },
            output,
        ),
        Commands::AddNode {
            source,
            name,
            remote,
            revision,
            repo_path,
            target_path,
            manifest,
        } => add::handle_add(
            &ImportOptions {
                source,
                name,
                remote,
                revision,
                repo_path,
                target_path,
                manifest,
            },
            output,
        ),
        Commands::RenameNode {
            path,
            non_interactive,
            rename_type,
            new_name,
            old_name,
            dry_run,
            no_backup,
            preview,
            yes,
        } => rename::handle_rename(
            &RenameNodeOptions {
                path,
                non_interactive,
                kind: rename_type.map(Into::into),
                new_name,
                old_name,
                dry_run,
                no_backup,
                yes,
                // No preview for JSON output
                preview: (output == OutputFormat::Summary).then(|| preview.into()),
                use_color,
            },
            output,
        ),
    };

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(exit_code_for(&e));
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let conflict = anyhow::Error::new(NodeError::AlreadyExists(PathBuf::from("motor")));
        assert_eq!(exit_code_for(&conflict), 1);

        let invalid = anyhow::Error::new(NodeError::invalid_name("9x", "leading digit"))
            .context("Failed to create node module");
        assert_eq!(exit_code_for(&invalid), 2);

        let git = anyhow::Error::new(NodeError::GitOperationFailed {
            command: "push".to_string(),
            message: "no remote".to_string(),
        });
        assert_eq!(exit_code_for(&git), 3);

        assert_eq!(exit_code_for(&anyhow::anyhow!("disk full")), 3);
    }
}
