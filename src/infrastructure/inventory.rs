//! Inventory snapshot source
//!
//! An inventory is a YAML (or JSON) dump of raw AWS records, typically produced
//! by `aws ec2 describe-*` post-processing. It stands in for live API access:
//!
//! ```yaml
//! vpcs:
//!   - id: vpc-1
//!     cidr_block: 10.0.0.0/16
//! subnets:
//!   - id: subnet-1
//!     vpc_id: vpc-1
//!     tags: { Name: public-a }
//! security_groups:
//!   - id: sg-1
//!     name: web
//!     vpc_id: vpc-1
//! instances:
//!   - id: i-1
//!     subnet_id: subnet-1
//!     security_group_ids: [sg-1]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use super::discovery::{KindFetcher, RegistryDiscovery, ResourceKind};
use super::error::{ImportError, ImportResult};
use super::model::{DiscoveryScope, MappedResources};
use super::naming::NameGenerator;
use super::registry::DiscoveryRegistry;
use super::resource_mapper::{AwsResourceMapper, RawInstance, RawSecurityGroup, RawSubnet, RawVpc};

/// Raw records captured from one AWS account/region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub vpcs: Vec<RawVpc>,
    #[serde(default)]
    pub subnets: Vec<RawSubnet>,
    #[serde(default)]
    pub security_groups: Vec<RawSecurityGroup>,
    #[serde(default)]
    pub instances: Vec<RawInstance>,
}

impl Inventory {
    /// Load an inventory file (YAML is a superset of JSON, so both parse)
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

    /// Restrict every record list to one VPC; an empty id keeps everything
    ///
    /// Instances carry no VPC id, so they are kept when their subnet belongs to the VPC.
    pub fn scoped_to(&self, vpc_id: &str) -> Inventory {
        if vpc_id.is_empty() {
            return self.clone();
        }

        let in_vpc = |id: &Option<String>| id.as_deref() == Some(vpc_id);

        let subnets: Vec<RawSubnet> = self.subnets.iter().filter(|s| in_vpc(&s.vpc_id)).cloned().collect();
        let subnet_ids: HashSet<&str> = subnets.iter().map(|s| s.id.as_str()).collect();

        let instances = self
            .instances
            .iter()
            .filter(|i| i.subnet_id.as_deref().is_some_and(|s| subnet_ids.contains(s)))
            .cloned()
            .collect();

        Inventory {
            vpcs: self.vpcs.iter().filter(|v| v.id == vpc_id).cloned().collect(),
            security_groups: self
                .security_groups
                .iter()
                .filter(|g| in_vpc(&g.vpc_id))
                .cloned()
                .collect(),
            instances,
            subnets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vpcs.is_empty()
            && self.subnets.is_empty()
            && self.security_groups.is_empty()
            && self.instances.is_empty()
    }
}

/// Fetcher serving the inventory-backed kinds
pub struct InventoryFetcher {
    inventory: Arc<Inventory>,
    mapper: AwsResourceMapper,
}

impl InventoryFetcher {
    /// Kinds an inventory can provide
    pub const KINDS: [ResourceKind; 4] = [
        ResourceKind::Vpc,
        ResourceKind::Subnet,
        ResourceKind::SecurityGroup,
        ResourceKind::Instance,
    ];

    pub fn new(inventory: Arc<Inventory>) -> Self {
        Self {
            inventory,
            mapper: AwsResourceMapper::new(),
        }
    }
}

impl KindFetcher for InventoryFetcher {
    fn fetch(
        &self,
        kind: ResourceKind,
        scope: &DiscoveryScope,
        names: &mut NameGenerator,
    ) -> ImportResult<MappedResources> {
        let scoped = self.inventory.scoped_to(&scope.vpc_id);
        let region = scope.region.as_str();

        match kind {
            ResourceKind::Vpc => Ok(self.mapper.map_vpcs(&scoped.vpcs, region, names)),
            ResourceKind::Subnet => Ok(self.mapper.map_subnets(&scoped.subnets, region, names)),
            ResourceKind::SecurityGroup => {
                Ok(self.mapper.map_security_groups(&scoped.security_groups, region, names))
            }
            ResourceKind::Instance => Ok(self.mapper.map_instances(&scoped.instances, region, names)),
            other => Err(ImportError::UnsupportedResourceKind(other.to_string())),
        }
    }
}

/// Build a discovery over an inventory, one registry entry per supported kind
pub fn inventory_discovery(inventory: Inventory) -> RegistryDiscovery {
    let inventory = Arc::new(inventory);
    let mut registry = DiscoveryRegistry::new();

    for kind in InventoryFetcher::KINDS {
        registry.register(kind, Box::new(InventoryFetcher::new(Arc::clone(&inventory))));
    }

    RegistryDiscovery::new(registry)
}
