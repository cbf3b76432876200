use anyhow::Result;
use onekit_core::{
    add_node_operation, ImportOptions, OutputFormat, OutputFormatter, WestWorkspace,
};

use crate::terminal_prompt;

pub fn handle_add(options: &ImportOptions, output: OutputFormat) -> Result<()> {
    let workspace = WestWorkspace::from_current_dir()?;
    let mut prompt = terminal_prompt(output);
    let result = add_node_operation(options, &workspace, workspace.start(), &mut prompt)?;

    print!("{}", result.format(output));
    Ok(())
}
