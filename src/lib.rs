//! Bring existing VPC resources under Terraform management.
//!
//! Discovered resources are mapped into a resource/relation graph, checked
//! against `resource` blocks already declared in a Terraform directory, and
//! the remainder is written out as per-type HCL files plus a
//! `terraform import` script.

pub mod commands;
pub mod config;
pub mod context;
pub mod iac;
pub mod import;
pub mod infrastructure;
pub mod output;
pub mod traits;
