use anyhow::{Context as _, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::ImporterConfig;
use crate::context::Context;
use crate::iac::TerraformCli;
use crate::import::{ImportPipeline, ImportRequest, SplitStrategy};
use crate::infrastructure::{inventory_discovery, parse_filters, DiscoveryScope, Inventory};

/// Generate HCL and an import script for the resources of one VPC
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// VPC to import
    #[arg(long)]
    pub vpc_id: String,

    /// AWS region (falls back to AWS_REGION, then AWS_DEFAULT_REGION)
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS named profile
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Terraform working directory scanned for existing resources
    #[arg(long, default_value = ".")]
    pub tf_dir: PathBuf,

    /// Inventory snapshot (YAML or JSON) of the account's raw records
    #[arg(long)]
    pub inventory: PathBuf,

    /// Run terraform init and import after generating files
    #[arg(long)]
    pub apply: bool,

    /// Filter like `type=aws_instance,tag:Env=prod`; repeat to OR filters
    #[arg(long = "resource-filters")]
    pub resource_filters: Vec<String>,

    /// Directory for generated HCL (defaults to <tf-dir>/generated)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// How to split generated HCL: by_type, by_module, single
    #[arg(long)]
    pub split_strategy: Option<String>,

    /// Importer config file (defaults to <tf-dir>/.vpc-importer.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write the run summary as JSON to this path
    #[arg(long)]
    pub summary_json: Option<PathBuf>,
}

impl ImportCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let file_config = ImporterConfig::resolve(self.config.as_deref(), &self.tf_dir)
            .context("Failed to load importer config")?;

        let split_strategy = self
            .split_strategy
            .as_deref()
            .map(str::parse::<SplitStrategy>)
            .transpose()?;

        let config = file_config.merge(ImporterConfig {
            output_dir: self.output_dir.clone(),
            split_strategy,
            resource_filters: self.resource_filters.clone(),
            ..Default::default()
        });

        let scope = DiscoveryScope {
            vpc_id: self.vpc_id.clone(),
            region: resolve_region(self.region.clone()),
            profile: self.profile.clone(),
            resource_filters: parse_filters(&config.resource_filters)?,
        };

        ctx.output.info(&format!("Loading inventory for {}...", scope.vpc_id));
        let inventory = Inventory::load(&self.inventory)
            .with_context(|| format!("Failed to load inventory {}", self.inventory.display()))?;
        let discovery = inventory_discovery(inventory);

        let mut request = ImportRequest::new(scope, &self.tf_dir);
        request.output_dir = config.output_dir.clone();
        request.split_strategy = config.split_strategy();
        request.script_name = config.script_name().to_string();
        request.shell = config.shell().to_string();
        request.terraform_bin = config.terraform_bin().to_string();
        request.apply = self.apply;

        let terraform = TerraformCli::new(config.terraform_bin(), ctx.command.clone());
        let mut pipeline = ImportPipeline::new(&discovery);
        if self.apply {
            ctx.output.info(&format!("Running {} import...", terraform_name(config.terraform_bin())));
            pipeline = pipeline.with_executor(&terraform);
        }

        let outcome = pipeline.run(&request)?;

        if let Some(path) = &self.summary_json {
            std::fs::write(path, outcome.summary.to_json()?)
                .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        }

        outcome.summary.render(ctx.output.as_ref());

        if outcome.summary.has_errors() {
            anyhow::bail!("{} error(s) during import", outcome.summary.errors.len());
        }

        Ok(())
    }
}

fn resolve_region(flag: Option<String>) -> String {
    flag.filter(|r| !r.is_empty())
        .or_else(|| std::env::var("AWS_DEFAULT_REGION").ok())
        .unwrap_or_default()
}

fn terraform_name(bin: &str) -> &str {
    std::path::Path::new(bin)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(bin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockCommandExecutor, MockCommandResult, MockOutput, OutputMessage};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    const INVENTORY: &str = r#"
vpcs:
  - id: vpc-1
    tags: { Name: main }
subnets:
  - id: subnet-1
    vpc_id: vpc-1
    tags: { Name: public-a }
instances:
  - id: i-1
    subnet_id: subnet-1
    tags: { Name: web-1, Env: prod }
"#;

    fn command(dir: &TempDir) -> ImportCommand {
        let inventory = dir.path().join("inventory.yaml");
        fs::write(&inventory, INVENTORY).unwrap();

        ImportCommand {
            vpc_id: "vpc-1".to_string(),
            region: Some("eu-west-1".to_string()),
            profile: None,
            tf_dir: dir.path().to_path_buf(),
            inventory,
            apply: false,
            resource_filters: vec![],
            output_dir: None,
            split_strategy: None,
            config: None,
            summary_json: None,
        }
    }

    #[test]
    fn test_import_generates_artifacts() {
        let dir = TempDir::new().unwrap();
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(output.clone(), Arc::new(MockCommandExecutor::new()));

        command(&dir).execute(&ctx).unwrap();

        assert!(dir.path().join("generated/aws_instance.tf").is_file());
        assert!(dir.path().join("import.sh").is_file());
        assert!(output.contains_message(&OutputMessage::KeyValue("Importable".into(), "3".into())));
    }

    #[test]
    fn test_filters_and_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".vpc-importer.yaml"),
            "script_name: run-import.sh\nresource_filters:\n  - type=aws_instance\n",
        )
        .unwrap();
        let ctx = Context::test();

        let mut cmd = command(&dir);
        cmd.summary_json = Some(dir.path().join("summary.json"));
        cmd.execute(&ctx).unwrap();

        let script = fs::read_to_string(dir.path().join("run-import.sh")).unwrap();
        assert!(script.contains("\"aws_instance.web_1\" \"i-1\""));
        assert!(!script.contains("aws_subnet"));

        let summary = fs::read_to_string(dir.path().join("summary.json")).unwrap();
        assert!(summary.contains("\"importable\": 1"));
    }

    #[test]
    fn test_apply_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let output = Arc::new(MockOutput::new());
        let mock = Arc::new(MockCommandExecutor::with_outputs(vec![MockCommandResult::failure(
            "terraform import aws_subnet.public_a",
            1,
            "Error: Cannot import non-existent remote object",
        )]));
        let ctx = Context::test_with(output.clone(), mock.clone());

        let mut cmd = command(&dir);
        cmd.apply = true;
        let result = cmd.execute(&ctx);

        assert!(result.is_err());
        assert_eq!(mock.calls().len(), 4);
        assert_eq!(mock.calls()[0], "terraform init -input=false");
        assert!(output.get_errors().iter().any(|e| e.contains("aws_subnet.public_a")));
    }

    #[test]
    fn test_unsupported_split_strategy() {
        let dir = TempDir::new().unwrap();
        let mut cmd = command(&dir);
        cmd.split_strategy = Some("single".to_string());

        assert!(cmd.execute(&Context::test()).is_err());
        assert!(!dir.path().join("import.sh").exists());
    }

    #[test]
    fn test_terraform_name() {
        assert_eq!(terraform_name("/usr/local/bin/tofu"), "tofu");
        assert_eq!(terraform_name("terraform"), "terraform");
    }
}
