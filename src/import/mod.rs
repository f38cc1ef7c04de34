//! Turning discovered resources into Terraform artifacts
//!
//! - `existing_config`: index `resource` blocks already declared under a
//!   Terraform directory and split candidates into importable / conflicted
//! - `hcl_generator`: write one `<type>.tf` file per resource type, with
//!   relations resolved into reference expressions
//! - `import_script`: write an executable `terraform import` script
//! - `pipeline`: run the whole flow, optionally applying the imports
//! - `summary`: counts and messages for the caller to render

pub mod existing_config;
pub mod hcl_generator;
pub mod import_script;
pub mod pipeline;
pub mod summary;

pub use existing_config::{
    filter_conflicted, ConflictReport, ConflictedResource, ExistingConfigAnalyzer, ExistingConfigIndex,
    ExistingResourceMeta, ResourceKey,
};
pub use hcl_generator::{HclGenerationConfig, HclGenerationResult, HclGenerator, SplitStrategy};
pub use import_script::{generate_import_script, resolve_import_id, ImportScript, ImportScriptConfig};
pub use pipeline::{ImportOutcome, ImportPipeline, ImportRequest};
pub use summary::{ApplyReport, ImportSummary};
