use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::import::hcl_generator::SplitStrategy;
use crate::infrastructure::error::{ImportError, ImportResult};

/// Config file looked up in the Terraform directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = ".vpc-importer.yaml";

/// Importer settings loaded from YAML
///
/// ```yaml
/// output_dir: generated
/// split_strategy: by_type
/// script_name: import.sh
/// shell: bash
/// terraform_bin: tofu
/// resource_filters:
///   - type=aws_instance,tag:Env=prod
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImporterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_strategy: Option<SplitStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_bin: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_filters: Vec<String>,
}

impl ImporterConfig {
    pub fn load(path: &Path) -> ImportResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ImportError::fs(path, e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> ImportResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load the explicit config file, else `<tf_dir>/.vpc-importer.yaml` if present
    pub fn resolve(explicit: Option<&Path>, tf_dir: &Path) -> ImportResult<Self> {
        if let Some(path) = explicit {
            tracing::debug!(config = %path.display(), "loading config");
            return Self::load(path);
        }

        let default_path = tf_dir.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            tracing::debug!(config = %default_path.display(), "loading config");
            return Self::load(&default_path);
        }

        Ok(Self::default())
    }

    /// Overlay values set on `overrides` (command-line flags) onto this config
    pub fn merge(self, overrides: ImporterConfig) -> ImporterConfig {
        ImporterConfig {
            output_dir: overrides.output_dir.or(self.output_dir),
            split_strategy: overrides.split_strategy.or(self.split_strategy),
            script_name: overrides.script_name.or(self.script_name),
            shell: overrides.shell.or(self.shell),
            terraform_bin: overrides.terraform_bin.or(self.terraform_bin),
            resource_filters: if overrides.resource_filters.is_empty() {
                self.resource_filters
            } else {
                overrides.resource_filters
            },
        }
    }

    pub fn split_strategy(&self) -> SplitStrategy {
        self.split_strategy.unwrap_or_default()
    }

    pub fn script_name(&self) -> &str {
        self.script_name.as_deref().unwrap_or("import.sh")
    }

    pub fn shell(&self) -> &str {
        self.shell.as_deref().unwrap_or("bash")
    }

    pub fn terraform_bin(&self) -> &str {
        self.terraform_bin.as_deref().unwrap_or("terraform")
    }
}
