use crate::config::Config;
use crate::output::CreateResult;
use crate::scaffold::{scaffold_module, ScaffoldOptions};
use crate::workspace::RootResolver;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Create-node operation - returns structured data
pub fn create_node_operation(
    options: &ScaffoldOptions,
    resolver: &dyn RootResolver,
    cwd: &Path,
) -> Result<CreateResult> {
    let root = resolver.resolve_root();
    debug!("Workspace root: {}", root.display());
    let config = Config::load(&root)?;

    let report = scaffold_module(options, &root, cwd, &config)?;

    Ok(CreateResult {
        module_name: report.module_name,
        module_dir: report.module_dir,
        node_class: report.node_class,
        data_class: report.data_class,
        config_name: report.config_name,
        files: report.files,
        manifest: report.manifest,
        git_initialized: report.git.map(|git| git.is_clean()),
        warnings: report.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::FixedRoot;
    use tempfile::TempDir;

    #[test]
    fn test_create_uses_configured_nodes_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.defaults.nodes_dir = "nodes".to_string();
        config.save(temp_dir.path()).unwrap();

        let options = ScaffoldOptions {
            target: "motor".to_string(),
            ..Default::default()
        };
        let result = create_node_operation(
            &options,
            &FixedRoot(temp_dir.path().to_path_buf()),
            temp_dir.path(),
        )
        .unwrap();

        assert_eq!(result.module_dir, temp_dir.path().join("nodes/motor"));
        assert_eq!(result.node_class, "MotorNode");
        assert_eq!(result.git_initialized, None);
        assert!(result.module_dir.join("src/MotorNode.cpp").is_file());
    }
}
