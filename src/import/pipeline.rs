//! End-to-end import run: discover, classify against existing HCL, generate
//! HCL and the import script, and optionally run the imports.

use std::path::PathBuf;

use super::existing_config::{filter_conflicted, ConflictReport, ExistingConfigAnalyzer};
use super::hcl_generator::{HclGenerationConfig, HclGenerationResult, HclGenerator, SplitStrategy};
use super::import_script::{generate_import_script, resolve_import_id, ImportScript, ImportScriptConfig};
use super::summary::{ApplyReport, ImportSummary};
use crate::iac::TerraformExecutor;
use crate::infrastructure::discovery::CloudDiscovery;
use crate::infrastructure::error::{ImportError, ImportResult};
use crate::infrastructure::model::{DiscoveryScope, Resource};
use crate::infrastructure::naming::NameGenerator;

/// Everything one import run needs
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub scope: DiscoveryScope,
    pub tf_dir: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub split_strategy: SplitStrategy,
    pub script_name: String,
    pub shell: String,
    pub terraform_bin: String,
    /// Run `init` and `import` after generating artifacts
    pub apply: bool,
}

impl ImportRequest {
    pub fn new(scope: DiscoveryScope, tf_dir: impl Into<PathBuf>) -> Self {
        let script = ImportScriptConfig::default();
        Self {
            scope,
            tf_dir: tf_dir.into(),
            output_dir: None,
            split_strategy: SplitStrategy::default(),
            script_name: script.script_name,
            shell: script.shell,
            terraform_bin: script.terraform_bin,
            apply: false,
        }
    }

    fn hcl_config(&self) -> HclGenerationConfig {
        HclGenerationConfig {
            tf_dir: Some(self.tf_dir.clone()),
            output_dir: self.output_dir.clone(),
            split_strategy: self.split_strategy,
        }
    }

    fn script_config(&self) -> ImportScriptConfig {
        ImportScriptConfig {
            tf_dir: self.tf_dir.clone(),
            script_name: self.script_name.clone(),
            shell: self.shell.clone(),
            terraform_bin: self.terraform_bin.clone(),
        }
    }
}

/// Artifacts and summary of a finished run
#[derive(Debug)]
pub struct ImportOutcome {
    pub report: ConflictReport,
    pub hcl: HclGenerationResult,
    pub script: ImportScript,
    pub summary: ImportSummary,
}

/// Drives one import run over its collaborators
pub struct ImportPipeline<'a> {
    discovery: &'a dyn CloudDiscovery,
    executor: Option<&'a dyn TerraformExecutor>,
}

impl<'a> ImportPipeline<'a> {
    pub fn new(discovery: &'a dyn CloudDiscovery) -> Self {
        Self {
            discovery,
            executor: None,
        }
    }

    pub fn with_executor(mut self, executor: &'a dyn TerraformExecutor) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn run(&self, request: &ImportRequest) -> ImportResult<ImportOutcome> {
        // Input errors surface before any discovery or write
        if request.split_strategy != SplitStrategy::ByType {
            return Err(ImportError::UnsupportedSplitStrategy(
                request.split_strategy.to_string(),
            ));
        }
        if request.tf_dir.as_os_str().is_empty() {
            return Err(ImportError::InvalidInput("tf_dir is required".to_string()));
        }
        if request.apply && self.executor.is_none() {
            return Err(ImportError::InvalidInput(
                "apply requested without a terraform executor".to_string(),
            ));
        }

        let mut names = NameGenerator::new();
        let batch = self.discovery.list_resources(&request.scope, &mut names)?;
        tracing::info!(
            resources = batch.resources.len(),
            relations = batch.relations.len(),
            "discovery finished"
        );

        let index = ExistingConfigAnalyzer::new().analyze(&request.tf_dir)?;
        let report = filter_conflicted(&batch.resources, &index);

        let hcl = HclGenerator::new().generate(&report.importable, &batch.relations, &request.hcl_config())?;
        let script = generate_import_script(&report.importable, &request.script_config())?;

        let mut summary = ImportSummary::new(&request.scope.vpc_id, &request.scope.region);
        summary.record_conflicts(&report);
        summary.hcl_files = hcl.generated_files.len();
        summary.import_commands = script.command_count;
        summary.output_dir = Some(hcl.output_dir.clone());
        summary.script_path = Some(script.path.clone());

        if let Some(executor) = self.executor.filter(|_| request.apply) {
            summary.apply = Some(run_imports(executor, request, &report.importable, &mut summary));
        }

        Ok(ImportOutcome {
            report,
            hcl,
            script,
            summary,
        })
    }
}

/// Init once, then import each resource; failures are recorded and the loop continues
fn run_imports(
    executor: &dyn TerraformExecutor,
    request: &ImportRequest,
    resources: &[Resource],
    summary: &mut ImportSummary,
) -> ApplyReport {
    let mut report = ApplyReport::default();

    if let Err(e) = executor.init(&request.tf_dir) {
        summary.add_error(format!("{} init failed: {}", executor.binary(), e));
        return report;
    }

    for resource in resources {
        let address = resource.address();
        let Some(id) = resolve_import_id(resource) else {
            report.skipped += 1;
            summary.add_warning(format!("{} has no import id, skipped", address));
            continue;
        };

        report.attempted += 1;
        match executor.import(&request.tf_dir, &address, id) {
            Ok(()) => {
                tracing::info!(address = %address, id = %id, "imported");
                report.succeeded += 1;
            }
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "import failed");
                report.failed += 1;
                summary.add_error(format!("Failed to import {}: {}", address, e));
            }
        }
    }

    report
}
