use anyhow::{Context as _, Result};
use clap::Args;
use std::path::PathBuf;

use crate::context::Context;
use crate::import::ExistingConfigAnalyzer;

/// List the resources already declared under a Terraform directory
#[derive(Debug, Args)]
pub struct AnalyzeCommand {
    /// Terraform working directory to scan
    #[arg(long, default_value = ".")]
    pub tf_dir: PathBuf,
}

impl AnalyzeCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let index = ExistingConfigAnalyzer::new()
            .analyze(&self.tf_dir)
            .with_context(|| format!("Failed to analyze {}", self.tf_dir.display()))?;

        ctx.output.section("Declared resources");

        if index.is_empty() {
            ctx.output.dimmed("No resource blocks found");
            return Ok(());
        }

        for (key, meta) in index.entries() {
            ctx.output.key_value(&key.address(), &meta.to_string());
        }

        ctx.output.blank();
        ctx.output.info(&format!("{} resource(s) declared", index.len()));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockCommandExecutor, MockOutput, OutputMessage};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_lists_resources() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("main.tf"),
            "resource \"aws_vpc\" \"main\" {\n}\n\nresource \"aws_subnet\" \"a\" {\n}\n",
        )
        .unwrap();

        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(output.clone(), Arc::new(MockCommandExecutor::new()));

        AnalyzeCommand {
            tf_dir: dir.path().to_path_buf(),
        }
        .execute(&ctx)
        .unwrap();

        let expected = format!("{}:4", dir.path().join("main.tf").display());
        assert!(output.contains_message(&OutputMessage::KeyValue("aws_subnet.a".into(), expected)));
        assert!(output.contains_message(&OutputMessage::Info("2 resource(s) declared".into())));
    }

    #[test]
    fn test_analyze_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = AnalyzeCommand {
            tf_dir: dir.path().join("missing"),
        }
        .execute(&Context::test());

        assert!(result.is_err());
    }
}
