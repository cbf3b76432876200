use crate::rename::{ApplyReport, RenameKind, RenamePlan};
use serde::Serialize;
use serde_json::json;
use std::fmt::Write;
use std::path::PathBuf;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

/// Result of a create-node operation
#[derive(Debug, Serialize)]
pub struct CreateResult {
    pub module_name: String,
    pub module_dir: PathBuf,
    pub node_class: String,
    pub data_class: String,
    pub config_name: String,
    pub files: Vec<String>,
    pub manifest: Option<PathBuf>,
    pub git_initialized: Option<bool>,
    pub warnings: Vec<String>,
}

/// Result of an add-node operation
#[derive(Debug, Serialize)]
pub struct AddResult {
    pub name: String,
    pub path: String,
    pub url: Option<String>,
    pub revision: Option<String>,
    pub manifest: Option<PathBuf>,
    pub replaced: bool,
    pub cancelled: bool,
    pub config_name: Option<String>,
    pub missing_dependencies: Vec<String>,
}

/// Result of a rename-node operation
#[derive(Debug, Serialize)]
pub struct RenameResult {
    pub kind: Option<RenameKind>,
    pub module_dir: PathBuf,
    pub old_name: Option<String>,
    pub new_name: Option<String>,
    pub new_identifier: Option<String>,
    pub dry_run: bool,
    pub cancelled: bool,
    pub backup: Option<PathBuf>,
    /// Where the module lives after a module rename
    pub new_module_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<RenamePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ApplyReport>,
}

impl RenameResult {
    pub fn cancelled(module_dir: PathBuf) -> Self {
        Self {
            kind: None,
            module_dir,
            old_name: None,
            new_name: None,
            new_identifier: None,
            dry_run: false,
            cancelled: true,
            backup: None,
            new_module_dir: None,
            plan: None,
            report: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.report.as_ref().map_or(true, ApplyReport::is_success)
    }
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

impl OutputFormatter for CreateResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "create-node",
            "module": self,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = format!("Successfully created node module: {}\n", self.module_name);
        let dir = self.module_dir.display();

        writeln!(output, "Location: {}", dir).unwrap();
        for warning in &self.warnings {
            writeln!(output, "Warning: {}", warning).unwrap();
        }
        if let Some(manifest) = &self.manifest {
            writeln!(output, "✓ Added to manifest {}", manifest.display()).unwrap();
        }
        if self.git_initialized == Some(true) {
            output.push_str("✓ Initialized git repository\n");
        }

        output.push_str("\nNext steps:\n");
        writeln!(
            output,
            "  1. Implement your node logic in: {}/src/{}.cpp",
            dir, self.node_class
        )
        .unwrap();
        writeln!(
            output,
            "  2. Define data structure in: {}/include/{}.hpp",
            dir, self.data_class
        )
        .unwrap();
        if self.manifest.is_none() {
            writeln!(
                output,
                "  3. Add module to west.yml or use: onekit add-node {}",
                dir
            )
            .unwrap();
        }
        writeln!(output, "  4. Enable in Kconfig: CONFIG_{}=y", self.config_name).unwrap();

        output
    }
}

impl OutputFormatter for AddResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": !self.cancelled,
            "operation": "add-node",
            "module": self,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if self.cancelled {
            return "Cancelled\n".to_string();
        }

        let mut output = format!("Successfully added module: {}\n", self.name);
        if let Some(manifest) = &self.manifest {
            writeln!(output, "Manifest: {}", manifest.display()).unwrap();
        }
        if self.replaced {
            output.push_str("✓ Replaced the existing entry\n");
        }
        for dep in &self.missing_dependencies {
            writeln!(output, "Warning: dependency '{}' is not in the manifest", dep).unwrap();
        }

        output.push_str("\nNext steps:\n");
        output.push_str("  1. Run: west update\n");
        if let Some(config_name) = &self.config_name {
            writeln!(output, "  2. Enable in Kconfig: CONFIG_{}=y", config_name).unwrap();
        }

        output
    }
}

impl OutputFormatter for RenameResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.is_success() && !self.cancelled,
            "operation": "rename-node",
            "result": self,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if self.cancelled {
            return "Cancelled\n".to_string();
        }
        if self.dry_run {
            return "Dry run - no changes made\n".to_string();
        }
        if self.report.is_none() {
            return "Nothing to rename\n".to_string();
        }

        let mut output = String::new();
        if let Some(backup) = &self.backup {
            writeln!(output, "Created backup: {}", backup.display()).unwrap();
        }

        if let Some(report) = &self.report {
            writeln!(output, "✓ Updated {} files", report.files_updated.len()).unwrap();
            if !report.renamed.is_empty() {
                writeln!(output, "✓ Renamed {} paths", report.renamed.len()).unwrap();
            }
            for missing in &report.files_missing {
                writeln!(output, "Warning: file not found: {}", missing.display()).unwrap();
            }
            for failure in &report.failures {
                writeln!(
                    output,
                    "✗ {}: {}",
                    failure.path.display(),
                    failure.message
                )
                .unwrap();
            }
        }

        if self.is_success() {
            output.push_str("Rename completed successfully!\n");
        } else {
            output.push_str("Rename finished with errors; nothing was rolled back\n");
        }
        if let Some(dir) = &self.new_module_dir {
            writeln!(output, "Module is now at: {}", dir.display()).unwrap();
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rename::ApplyFailure;

    fn create_result() -> CreateResult {
        CreateResult {
            module_name: "led-controller".to_string(),
            module_dir: PathBuf::from("/ws/modules/lib/nodes/led-controller"),
            node_class: "LedControllerNode".to_string(),
            data_class: "LedControllerData".to_string(),
            config_name: "LED_CONTROLLER".to_string(),
            files: vec!["CMakeLists.txt".to_string()],
            manifest: None,
            git_initialized: None,
            warnings: vec![],
        }
    }

    #[test]
    fn test_create_summary_next_steps() {
        let summary = create_result().format(OutputFormat::Summary);
        assert!(summary.contains("src/LedControllerNode.cpp"));
        assert!(summary.contains("include/LedControllerData.hpp"));
        assert!(summary.contains("onekit add-node"));
        assert!(summary.contains("CONFIG_LED_CONTROLLER=y"));
    }

    #[test]
    fn test_create_json() {
        let json: serde_json::Value =
            serde_json::from_str(&create_result().format(OutputFormat::Json)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["operation"], "create-node");
        assert_eq!(json["module"]["node_class"], "LedControllerNode");
    }

    #[test]
    fn test_add_cancelled() {
        let result = AddResult {
            name: "fan".to_string(),
            path: "modules/lib/nodes/fan".to_string(),
            url: None,
            revision: None,
            manifest: None,
            replaced: false,
            cancelled: true,
            config_name: None,
            missing_dependencies: vec![],
        };
        assert_eq!(result.format_summary(), "Cancelled\n");
        let json: serde_json::Value = serde_json::from_str(&result.format_json()).unwrap();
        assert_eq!(json["success"], false);
    }

    #[test]
    fn test_rename_with_failures() {
        let mut result = RenameResult::cancelled(PathBuf::from("/ws/motor"));
        result.cancelled = false;
        result.report = Some(ApplyReport {
            failures: vec![ApplyFailure {
                path: PathBuf::from("/ws/motor/src/A.cpp"),
                message: "permission denied".to_string(),
            }],
            ..Default::default()
        });

        assert!(!result.is_success());
        let summary = result.format_summary();
        assert!(summary.contains("✗ /ws/motor/src/A.cpp: permission denied"));
        assert!(summary.contains("nothing was rolled back"));
    }

    #[test]
    fn test_rename_without_report_did_nothing() {
        let mut result = RenameResult::cancelled(PathBuf::from("/ws/motor"));
        result.cancelled = false;
        let summary = result.format_summary();
        assert_eq!(summary, "Nothing to rename\n");
        assert!(!summary.contains("successfully"));
    }

    #[test]
    fn test_rename_dry_run() {
        let mut result = RenameResult::cancelled(PathBuf::from("/ws/motor"));
        result.cancelled = false;
        result.dry_run = true;
        assert_eq!(result.format_summary(), "Dry run - no changes made\n");
        assert!(result.is_success());
    }
}
