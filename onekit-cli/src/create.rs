use anyhow::Result;
use onekit_core::{
    create_node_operation, OutputFormat, OutputFormatter, ScaffoldOptions, WestWorkspace,
};

pub fn handle_create(options: &ScaffoldOptions, output: OutputFormat) -> Result<()> {
    let workspace = WestWorkspace::from_current_dir()?;
    let result = create_node_operation(options, &workspace, workspace.start())?;

    print!("{}", result.format(output));
    Ok(())
}
