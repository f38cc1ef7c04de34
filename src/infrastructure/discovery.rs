use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::{ImportError, ImportResult};
use super::filter::match_resource;
use super::model::{DiscoveryScope, MappedResources};
use super::naming::NameGenerator;
use super::registry::DiscoveryRegistry;

/// Kinds of VPC-scoped resources a discovery source can enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vpc,
    Subnet,
    RouteTable,
    SecurityGroup,
    InternetGateway,
    NatGateway,
    Instance,
    LoadBalancer,
    RdsInstance,
    EcsCluster,
    EcsService,
    ElastiCacheCluster,
    CodeBuildProject,
    LambdaFunction,
}

impl ResourceKind {
    /// All kinds, in discovery order (network first, workloads last)
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::Vpc,
            ResourceKind::Subnet,
            ResourceKind::RouteTable,
            ResourceKind::SecurityGroup,
            ResourceKind::InternetGateway,
            ResourceKind::NatGateway,
            ResourceKind::Instance,
            ResourceKind::LoadBalancer,
            ResourceKind::RdsInstance,
            ResourceKind::EcsCluster,
            ResourceKind::EcsService,
            ResourceKind::ElastiCacheCluster,
            ResourceKind::CodeBuildProject,
            ResourceKind::LambdaFunction,
        ]
    }

    /// Terraform resource type produced for this kind
    pub fn terraform_type(&self) -> &'static str {
        match self {
            ResourceKind::Vpc => "aws_vpc",
            ResourceKind::Subnet => "aws_subnet",
            ResourceKind::RouteTable => "aws_route_table",
            ResourceKind::SecurityGroup => "aws_security_group",
            ResourceKind::InternetGateway => "aws_internet_gateway",
            ResourceKind::NatGateway => "aws_nat_gateway",
            ResourceKind::Instance => "aws_instance",
            ResourceKind::LoadBalancer => "aws_lb",
            ResourceKind::RdsInstance => "aws_db_instance",
            ResourceKind::EcsCluster => "aws_ecs_cluster",
            ResourceKind::EcsService => "aws_ecs_service",
            ResourceKind::ElastiCacheCluster => "aws_elasticache_cluster",
            ResourceKind::CodeBuildProject => "aws_codebuild_project",
            ResourceKind::LambdaFunction => "aws_lambda_function",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Vpc => "vpc",
            ResourceKind::Subnet => "subnet",
            ResourceKind::RouteTable => "route_table",
            ResourceKind::SecurityGroup => "security_group",
            ResourceKind::InternetGateway => "internet_gateway",
            ResourceKind::NatGateway => "nat_gateway",
            ResourceKind::Instance => "instance",
            ResourceKind::LoadBalancer => "load_balancer",
            ResourceKind::RdsInstance => "rds_instance",
            ResourceKind::EcsCluster => "ecs_cluster",
            ResourceKind::EcsService => "ecs_service",
            ResourceKind::ElastiCacheCluster => "elasticache_cluster",
            ResourceKind::CodeBuildProject => "codebuild_project",
            ResourceKind::LambdaFunction => "lambda_function",
        }
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = ImportError;

    /// Parse a kind from its snake_case name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ImportError::UnsupportedResourceKind(s.to_string()))
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fetches and maps the resources of one or more kinds
pub trait KindFetcher {
    /// Fetch all resources of `kind` inside `scope`
    fn fetch(
        &self,
        kind: ResourceKind,
        scope: &DiscoveryScope,
        names: &mut NameGenerator,
    ) -> ImportResult<MappedResources>;
}

/// Enumerates every resource in a discovery scope
pub trait CloudDiscovery {
    fn list_resources(
        &self,
        scope: &DiscoveryScope,
        names: &mut NameGenerator,
    ) -> ImportResult<MappedResources>;
}

/// Discovery driven by a kind -> fetcher registry
pub struct RegistryDiscovery {
    registry: DiscoveryRegistry,
}

impl RegistryDiscovery {
    pub fn new(registry: DiscoveryRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DiscoveryRegistry {
        &self.registry
    }
}

impl CloudDiscovery for RegistryDiscovery {
    fn list_resources(
        &self,
        scope: &DiscoveryScope,
        names: &mut NameGenerator,
    ) -> ImportResult<MappedResources> {
        tracing::debug!(vpc_id = %scope.vpc_id, region = %scope.region, "starting VPC discovery");

        let mut all = MappedResources::new();

        for kind in ResourceKind::all() {
            let Some(fetcher) = self.registry.get(*kind) else {
                tracing::debug!(kind = %kind, "no fetcher registered, skipping");
                continue;
            };

            let batch = fetcher.fetch(*kind, scope, names)?;
            tracing::debug!(
                kind = %kind,
                resources = batch.resources.len(),
                relations = batch.relations.len(),
                "fetched resources"
            );
            all.extend(batch);
        }

        let filtered = apply_filters(all, scope);

        tracing::debug!(
            resources = filtered.resources.len(),
            relations = filtered.relations.len(),
            "finished VPC discovery"
        );

        Ok(filtered)
    }
}

/// Keep the resources matching the scope filters and the relations leaving them
pub fn apply_filters(batch: MappedResources, scope: &DiscoveryScope) -> MappedResources {
    let resources: Vec<_> = batch
        .resources
        .into_iter()
        .filter(|r| match_resource(&scope.resource_filters, r))
        .collect();

    let kept: HashSet<&str> = resources.iter().map(|r| r.id.as_str()).collect();
    let relations = batch
        .relations
        .into_iter()
        .filter(|rel| kept.contains(rel.from.as_str()))
        .collect();

    MappedResources {
        resources,
        relations,
    }
}
