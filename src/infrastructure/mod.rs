//! Infrastructure Graph Module
//!
//! This module turns raw cloud records into the resource/relation graph used
//! by the HCL and import-script generators. It provides:
//!
//! - The graph model (`Resource`, `Relation`, `AttributeValue`)
//! - Collision-free Terraform logical names (`NameGenerator`)
//! - Type/tag filters (`ResourceFilter`, `match_resource`)
//! - Mapping of raw AWS records (`AwsResourceMapper`)
//! - Capability-oriented discovery (`ResourceKind` -> `KindFetcher` registry)
//!
//! # Usage
//!
//! ```no_run
//! use vpc_importer::infrastructure::{
//!     inventory_discovery, CloudDiscovery, DiscoveryScope, Inventory, NameGenerator,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let inventory = Inventory::load(std::path::Path::new("inventory.yaml"))?;
//! let discovery = inventory_discovery(inventory);
//!
//! let scope = DiscoveryScope {
//!     vpc_id: "vpc-12345".to_string(),
//!     region: "us-east-1".to_string(),
//!     ..Default::default()
//! };
//!
//! let mut names = NameGenerator::new();
//! let batch = discovery.list_resources(&scope, &mut names)?;
//! println!("{} resources", batch.resources.len());
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod error;
pub mod filter;
pub mod inventory;
pub mod model;
pub mod naming;
pub mod registry;
pub mod resource_mapper;

// Re-export commonly used types
pub use discovery::{CloudDiscovery, KindFetcher, RegistryDiscovery, ResourceKind};
pub use error::{ImportError, ImportResult};
pub use filter::{match_resource, parse_filters};
pub use inventory::{inventory_discovery, Inventory, InventoryFetcher};
pub use model::{
    AttributeValue, DiscoveryScope, MappedResources, Origin, Relation, RelationKind, Resource,
    ResourceFilter,
};
pub use naming::{sanitize_identifier, NameGenerator};
pub use registry::{DiscoveryRegistry, DiscoveryRegistryBuilder};
pub use resource_mapper::{AwsResourceMapper, RawInstance, RawSecurityGroup, RawSubnet, RawVpc};
