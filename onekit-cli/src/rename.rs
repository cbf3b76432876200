use anyhow::Result;
use onekit_core::{
    rename_node_operation, AssumeYes, NodeError, OutputFormat, OutputFormatter, Prompt,
    RenameNodeOptions, WestWorkspace,
};

use crate::terminal_prompt;

pub fn handle_rename(options: &RenameNodeOptions, output: OutputFormat) -> Result<()> {
    let workspace = WestWorkspace::from_current_dir()?;
    // Non-interactive runs never read stdin
    let mut prompt: Box<dyn Prompt> = if options.non_interactive {
        Box::new(AssumeYes)
    } else {
        Box::new(terminal_prompt(output))
    };
    let (result, preview) =
        rename_node_operation(options, &workspace, workspace.start(), prompt.as_mut())?;

    if let Some(preview) = preview {
        println!("{}", preview);
    }
    print!("{}", result.format(output));

    if let Some(failure) = result.report.as_ref().and_then(|r| r.failures.first()) {
        return Err(NodeError::PartialApplyFailure {
            path: failure.path.clone(),
            message: failure.message.clone(),
        }
        .into());
    }
    Ok(())
}
