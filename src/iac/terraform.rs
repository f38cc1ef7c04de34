use std::path::Path;
use std::sync::Arc;

use super::executor::TerraformExecutor;
use crate::infrastructure::error::{ImportError, ImportResult};
use crate::traits::CommandExecutor;

/// Terraform (or OpenTofu) driven through its CLI
pub struct TerraformCli {
    binary: String,
    command: Arc<dyn CommandExecutor>,
}

impl TerraformCli {
    pub fn new(binary: impl Into<String>, command: Arc<dyn CommandExecutor>) -> Self {
        Self {
            binary: binary.into(),
            command,
        }
    }

    fn run(&self, args: &[&str], working_dir: &Path) -> ImportResult<()> {
        let command_line = format!("{} {}", self.binary, args.join(" "));
        tracing::debug!(command = %command_line, dir = %working_dir.display(), "running");

        let output = self
            .command
            .execute(&self.binary, args, working_dir)
            .map_err(|e| ImportError::ExecutorFailed {
                command: command_line.clone(),
                message: e.to_string(),
                exit_code: None,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(ImportError::ExecutorFailed {
            command: command_line,
            message: stderr,
            exit_code: output.status.code(),
        })
    }
}

impl TerraformExecutor for TerraformCli {
    fn init(&self, working_dir: &Path) -> ImportResult<()> {
        self.run(&["init", "-input=false"], working_dir)
    }

    fn import(&self, working_dir: &Path, address: &str, import_id: &str) -> ImportResult<()> {
        self.run(&["import", address, import_id], working_dir)
    }

    fn binary(&self) -> &str {
        &self.binary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockCommandExecutor, MockCommandResult};
    use std::path::PathBuf;

    #[test]
    fn test_init_and_import_arguments() {
        let mock = Arc::new(MockCommandExecutor::new());
        let cli = TerraformCli::new("terraform", mock.clone());
        let dir = PathBuf::from("/tmp/infra");

        cli.init(&dir).unwrap();
        cli.import(&dir, "aws_instance.web_1", "i-1234").unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                "terraform init -input=false",
                "terraform import aws_instance.web_1 i-1234",
            ]
        );
    }

    #[test]
    fn test_non_zero_exit_is_wrapped() {
        let mock = Arc::new(MockCommandExecutor::with_outputs(vec![MockCommandResult::failure(
            "tofu import",
            1,
            "Error: resource already managed\n",
        )]));
        let cli = TerraformCli::new("tofu", mock);

        let err = cli
            .import(&PathBuf::from("."), "aws_vpc.main", "vpc-1")
            .unwrap_err();

        match err {
            ImportError::ExecutorFailed {
                command,
                message,
                exit_code,
            } => {
                assert_eq!(command, "tofu import aws_vpc.main vpc-1");
                assert_eq!(message, "Error: resource already managed");
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_binary_name() {
        let cli = TerraformCli::new("tofu", Arc::new(MockCommandExecutor::new()));
        assert_eq!(cli.binary(), "tofu");
    }
}
