use crate::config::Config;
use crate::import::{import_module, ImportOptions, ImportOutcome};
use crate::output::AddResult;
use crate::prompt::Prompt;
use crate::workspace::RootResolver;
use anyhow::Result;
use std::path::Path;

/// Add-node operation - returns structured data
pub fn add_node_operation(
    options: &ImportOptions,
    resolver: &dyn RootResolver,
    cwd: &Path,
    prompt: &mut dyn Prompt,
) -> Result<AddResult> {
    let root = resolver.resolve_root();
    let config = Config::load(&root)?;

    let result = match import_module(options, &root, cwd, &config, prompt)? {
        ImportOutcome::Added(report) => AddResult {
            name: report.descriptor.name,
            path: report.descriptor.path,
            url: report.descriptor.url,
            revision: report.descriptor.revision,
            manifest: Some(report.manifest),
            replaced: report.replaced,
            cancelled: false,
            config_name: Some(report.config_name),
            missing_dependencies: report.missing_dependencies,
        },
        ImportOutcome::Cancelled { name } => AddResult {
            name,
            path: String::new(),
            url: None,
            revision: None,
            manifest: None,
            replaced: false,
            cancelled: true,
            config_name: None,
            missing_dependencies: vec![],
        },
    };

    Ok(result)
}
