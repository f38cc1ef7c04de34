//! AWS Resource Mapper
//!
//! Maps raw AWS records (as returned by the EC2 describe APIs or captured in an
//! inventory snapshot) to the common [`Resource`]/[`Relation`] graph.
//!
//! Attributes keep the raw native ids (`subnet_id`, `vpc_security_group_ids`,
//! ...); turning them into HCL references is the generator's job.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::model::{AttributeValue, MappedResources, Origin, Relation, RelationKind, Resource, resource_key};
use super::naming::NameGenerator;

pub const AWS_PROVIDER: &str = "aws";

pub const AWS_VPC: &str = "aws_vpc";
pub const AWS_SUBNET: &str = "aws_subnet";
pub const AWS_SECURITY_GROUP: &str = "aws_security_group";
pub const AWS_INSTANCE: &str = "aws_instance";

/// Label injected with the discovery region
pub const REGION_LABEL: &str = "aws_region";
/// Label injected with the parent VPC id
pub const VPC_LABEL: &str = "vpc_id";

/// Raw VPC record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVpc {
    pub id: String,
    #[serde(default)]
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub enable_dns_support: Option<bool>,
    #[serde(default)]
    pub enable_dns_hostnames: Option<bool>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Raw subnet record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSubnet {
    pub id: String,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub map_public_ip_on_launch: Option<bool>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Raw security group record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSecurityGroup {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Raw EC2 instance record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInstance {
    pub id: String,
    #[serde(default)]
    pub ami: Option<String>,
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub subnet_id: Option<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Maps raw AWS records into resources and relations
///
/// Stateless; the caller threads its run-wide [`NameGenerator`] through every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsResourceMapper;

impl AwsResourceMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map VPC records; VPCs have no outgoing relations
    pub fn map_vpcs(&self, vpcs: &[RawVpc], region: &str, names: &mut NameGenerator) -> MappedResources {
        let mut mapped = MappedResources::new();

        for vpc in vpcs {
            let labels = build_labels(&vpc.tags, region, None);
            let mut resource = new_resource(AWS_VPC, &vpc.id, labels, names);

            let attrs = &mut resource.attributes;
            attrs.insert("id".to_string(), vpc.id.as_str().into());
            insert_opt_str(attrs, "cidr_block", &vpc.cidr_block);
            insert_opt_bool(attrs, "enable_dns_support", vpc.enable_dns_support);
            insert_opt_bool(attrs, "enable_dns_hostnames", vpc.enable_dns_hostnames);
            insert_tags(attrs, &vpc.tags);

            mapped.resources.push(resource);
        }

        mapped
    }

    /// Map subnet records, emitting subnet -> VPC `network` relations
    pub fn map_subnets(
        &self,
        subnets: &[RawSubnet],
        region: &str,
        names: &mut NameGenerator,
    ) -> MappedResources {
        let mut mapped = MappedResources::new();

        for subnet in subnets {
            let vpc_id = non_empty(&subnet.vpc_id);
            let labels = build_labels(&subnet.tags, region, vpc_id);
            let mut resource = new_resource(AWS_SUBNET, &subnet.id, labels, names);

            let attrs = &mut resource.attributes;
            attrs.insert("id".to_string(), subnet.id.as_str().into());
            insert_opt_str(attrs, "vpc_id", &subnet.vpc_id);
            insert_opt_str(attrs, "cidr_block", &subnet.cidr_block);
            insert_opt_str(attrs, "availability_zone", &subnet.availability_zone);
            insert_opt_bool(attrs, "map_public_ip_on_launch", subnet.map_public_ip_on_launch);
            insert_tags(attrs, &subnet.tags);

            if let Some(vpc_id) = vpc_id {
                mapped.relations.push(Relation::new(
                    resource.id.clone(),
                    resource_key(AWS_PROVIDER, AWS_VPC, vpc_id),
                    RelationKind::Network,
                ));
            }

            mapped.resources.push(resource);
        }

        mapped
    }

    /// Map security group records, emitting security group -> VPC `network` relations
    pub fn map_security_groups(
        &self,
        groups: &[RawSecurityGroup],
        region: &str,
        names: &mut NameGenerator,
    ) -> MappedResources {
        let mut mapped = MappedResources::new();

        for group in groups {
            let vpc_id = non_empty(&group.vpc_id);
            let labels = build_labels(&group.tags, region, vpc_id);

            // Name the resource after the group name when there is no Name tag.
            let mut resource = match non_empty(&group.name) {
                Some(group_name) if labels.get("Name").is_none_or(|n| n.is_empty()) => {
                    let mut naming = labels.clone();
                    naming.insert("Name".to_string(), group_name.to_string());

                    let name = names.generate(AWS_SECURITY_GROUP, &naming, &group.id);
                    let mut resource =
                        Resource::new(AWS_PROVIDER, AWS_SECURITY_GROUP, &group.id, name, Origin::Cloud);
                    resource.labels = labels;
                    resource
                }
                _ => new_resource(AWS_SECURITY_GROUP, &group.id, labels, names),
            };

            let attrs = &mut resource.attributes;
            attrs.insert("id".to_string(), group.id.as_str().into());
            insert_opt_str(attrs, "name", &group.name);
            insert_opt_str(attrs, "description", &group.description);
            insert_opt_str(attrs, "vpc_id", &group.vpc_id);
            insert_tags(attrs, &group.tags);

            if let Some(vpc_id) = vpc_id {
                mapped.relations.push(Relation::new(
                    resource.id.clone(),
                    resource_key(AWS_PROVIDER, AWS_VPC, vpc_id),
                    RelationKind::Network,
                ));
            }

            mapped.resources.push(resource);
        }

        mapped
    }

    /// Map instance records, emitting instance -> subnet `network` and
    /// instance -> security group `security` relations
    pub fn map_instances(
        &self,
        instances: &[RawInstance],
        region: &str,
        names: &mut NameGenerator,
    ) -> MappedResources {
        let mut mapped = MappedResources::new();

        for instance in instances {
            let labels = build_labels(&instance.tags, region, None);
            let mut resource = new_resource(AWS_INSTANCE, &instance.id, labels, names);

            let attrs = &mut resource.attributes;
            attrs.insert("id".to_string(), instance.id.as_str().into());
            insert_opt_str(attrs, "ami", &instance.ami);
            insert_opt_str(attrs, "instance_type", &instance.instance_type);
            insert_opt_str(attrs, "subnet_id", &instance.subnet_id);

            if !instance.security_group_ids.is_empty() {
                attrs.insert(
                    "vpc_security_group_ids".to_string(),
                    AttributeValue::StringList(instance.security_group_ids.clone()),
                );
            }

            insert_tags(attrs, &instance.tags);

            if let Some(subnet_id) = non_empty(&instance.subnet_id) {
                mapped.relations.push(Relation::new(
                    resource.id.clone(),
                    resource_key(AWS_PROVIDER, AWS_SUBNET, subnet_id),
                    RelationKind::Network,
                ));
            }

            for group_id in instance.security_group_ids.iter().filter(|id| !id.is_empty()) {
                mapped.relations.push(Relation::new(
                    resource.id.clone(),
                    resource_key(AWS_PROVIDER, AWS_SECURITY_GROUP, group_id),
                    RelationKind::Security,
                ));
            }

            mapped.resources.push(resource);
        }

        mapped
    }
}

fn new_resource(
    resource_type: &str,
    native_id: &str,
    labels: HashMap<String, String>,
    names: &mut NameGenerator,
) -> Resource {
    let name = names.generate(resource_type, &labels, native_id);
    let mut resource = Resource::new(AWS_PROVIDER, resource_type, native_id, name, Origin::Cloud);
    resource.labels = labels;
    resource
}

fn build_labels(tags: &HashMap<String, String>, region: &str, vpc_id: Option<&str>) -> HashMap<String, String> {
    let mut labels = tags.clone();

    if !region.is_empty() {
        labels.insert(REGION_LABEL.to_string(), region.to_string());
    }

    if let Some(vpc_id) = vpc_id {
        labels.insert(VPC_LABEL.to_string(), vpc_id.to_string());
    }

    labels
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn insert_opt_str(attrs: &mut BTreeMap<String, AttributeValue>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        attrs.insert(key.to_string(), AttributeValue::String(value.clone()));
    }
}

fn insert_opt_bool(attrs: &mut BTreeMap<String, AttributeValue>, key: &str, value: Option<bool>) {
    if let Some(value) = value {
        attrs.insert(key.to_string(), AttributeValue::Bool(value));
    }
}

fn insert_tags(attrs: &mut BTreeMap<String, AttributeValue>, tags: &HashMap<String, String>) {
    if !tags.is_empty() {
        let sorted: BTreeMap<String, String> = tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        attrs.insert("tags".to_string(), AttributeValue::Map(sorted));
    }
}
