use std::path::Path;

use crate::infrastructure::error::ImportResult;

/// Trait for the Terraform-compatible tool that consumes generated artifacts
pub trait TerraformExecutor {
    /// Initialize the working directory (providers, backend)
    fn init(&self, working_dir: &Path) -> ImportResult<()>;

    /// Bring one existing object under management at `address`
    fn import(&self, working_dir: &Path, address: &str, import_id: &str) -> ImportResult<()>;

    /// Binary name, e.g. `terraform` or `tofu`
    fn binary(&self) -> &str;
}
