use serde::Serialize;
use std::path::PathBuf;

use super::existing_config::ConflictReport;
use crate::traits::Output;

/// Outcome of running imports through the Terraform executor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplyReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Importable resources without a resolvable id
    pub skipped: usize,
}

/// Counts and messages from one import run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub vpc_id: String,
    pub region: String,
    pub total_discovered: usize,
    pub importable: usize,
    pub conflicted: usize,
    pub hcl_files: usize,
    pub import_commands: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply: Option<ApplyReport>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn new(vpc_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            vpc_id: vpc_id.into(),
            region: region.into(),
            ..Default::default()
        }
    }

    /// Record classification counts; each conflict becomes a warning with its location
    pub fn record_conflicts(&mut self, report: &ConflictReport) {
        self.total_discovered = report.importable.len() + report.conflicted.len();
        self.importable = report.importable.len();
        self.conflicted = report.conflicted.len();

        for conflict in &report.conflicted {
            self.warnings.push(format!(
                "{} is already declared at {}, skipped",
                conflict.imported.address(),
                conflict.existing
            ));
        }
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render the summary to the terminal
    pub fn render(&self, output: &dyn Output) {
        output.section("Import summary");
        output.key_value("VPC", &self.vpc_id);
        if !self.region.is_empty() {
            output.key_value("Region", &self.region);
        }
        output.key_value("Discovered", &self.total_discovered.to_string());
        output.key_value_highlight("Importable", &self.importable.to_string());
        output.key_value("Already declared", &self.conflicted.to_string());
        output.key_value("HCL files", &self.hcl_files.to_string());
        output.key_value("Import commands", &self.import_commands.to_string());

        if let Some(dir) = &self.output_dir {
            output.subsection("Generated HCL");
            output.path(&dir.display().to_string());
        }

        if let Some(script) = &self.script_path {
            output.subsection("Import script");
            output.path(&script.display().to_string());
        }

        if let Some(apply) = &self.apply {
            output.subsection("Terraform import");
            output.key_value("Attempted", &apply.attempted.to_string());
            output.key_value("Succeeded", &apply.succeeded.to_string());
            output.key_value("Failed", &apply.failed.to_string());
            if apply.skipped > 0 {
                output.key_value("Skipped (no id)", &apply.skipped.to_string());
            }
        }

        if !self.warnings.is_empty() {
            output.blank();
            for warning in &self.warnings {
                output.warning(warning);
            }
        }

        if !self.errors.is_empty() {
            output.blank();
            for error in &self.errors {
                output.error(error);
            }
        }

        output.blank();
        if self.has_errors() {
            output.error(&format!("Import finished with {} error(s)", self.errors.len()));
        } else if self.importable == 0 {
            output.info("Nothing to import");
        } else {
            output.success(&format!("Prepared {} resource(s) for import", self.importable));
        }
    }
}
