pub mod executor;
pub mod terraform;

pub use executor::TerraformExecutor;
pub use terraform::TerraformCli;
