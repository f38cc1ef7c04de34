use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Where a resource came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Discovered through a cloud provider API or inventory snapshot
    Cloud,
    /// Declared in an existing `.tf` configuration tree
    TerraformConfig,
    /// Captured in a previously applied state file
    TerraformState,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Cloud => "cloud",
            Origin::TerraformConfig => "terraform_config",
            Origin::TerraformState => "terraform_state",
        }
    }
}

/// Kind of directed relationship between two resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    DependsOn,
    /// Subnet -> VPC, instance -> subnet, ENI -> subnet
    Network,
    /// Instance -> security group
    Security,
    /// WAF web ACL -> load balancer
    SecurityL7,
    Iam,
    Storage,
    Monitoring,
    Encryption,
    Secret,
    Artifact,
    Messaging,
    /// Module or VPC containment
    Contains,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::DependsOn => "depends_on",
            RelationKind::Network => "network",
            RelationKind::Security => "security",
            RelationKind::SecurityL7 => "security_l7",
            RelationKind::Iam => "iam",
            RelationKind::Storage => "storage",
            RelationKind::Monitoring => "monitoring",
            RelationKind::Encryption => "encryption",
            RelationKind::Secret => "secret",
            RelationKind::Artifact => "artifact",
            RelationKind::Messaging => "messaging",
            RelationKind::Contains => "contains",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value of a single resource attribute
///
/// Raw native ids stay `String` until the HCL generator resolves a relation
/// and replaces them with a `Reference` or `ReferenceList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// Explicitly unset, never rendered
    Null,
    String(String),
    Bool(bool),
    Number(serde_json::Number),
    StringList(Vec<String>),
    /// HCL expression rendered verbatim (e.g. `aws_subnet.public_a.id`)
    Reference(String),
    ReferenceList(Vec<String>),
    /// Nested string map, used for tags
    Map(BTreeMap<String, String>),
    /// Anything without a native HCL rendering
    Opaque(serde_json::Value),
}

impl AttributeValue {
    /// Reference expression pointing at the `id` of another resource
    pub fn reference_to(resource: &Resource) -> Self {
        AttributeValue::Reference(resource.id_expression())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value.into())
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        AttributeValue::StringList(value)
    }
}

impl From<BTreeMap<String, String>> for AttributeValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        AttributeValue::Map(value)
    }
}

/// Canonical node for one real or declared infrastructure object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Stable key, `<provider>:<type>:<native id>`
    pub id: String,
    /// Provider name (e.g. `aws`)
    pub provider: String,
    /// Terraform resource type (e.g. `aws_instance`)
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Sanitized, collision-free Terraform logical name
    pub name: String,
    /// Tags and other free-form metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,
    pub origin: Origin,
}

impl Resource {
    /// Create a resource with no labels or attributes
    pub fn new(
        provider: impl Into<String>,
        resource_type: impl Into<String>,
        native_id: &str,
        name: impl Into<String>,
        origin: Origin,
    ) -> Self {
        let provider = provider.into();
        let resource_type = resource_type.into();

        Self {
            id: resource_key(&provider, &resource_type, native_id),
            provider,
            resource_type,
            name: name.into(),
            labels: HashMap::new(),
            attributes: BTreeMap::new(),
            origin,
        }
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Add an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Terraform address, `<type>.<name>`
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }

    /// Expression for this resource's `id` attribute
    pub fn id_expression(&self) -> String {
        format!("{}.id", self.address())
    }
}

/// Build the stable resource key from its parts
pub fn resource_key(provider: &str, resource_type: &str, native_id: &str) -> String {
    format!("{}:{}:{}", provider, resource_type, native_id)
}

/// Directed, typed edge between two resource keys
///
/// The target may not exist in the current resource set; consumers ignore it then.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
}

impl Relation {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }
}

/// Type and tag filter; every specified condition must hold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFilter {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, rename = "tagFilters", skip_serializing_if = "HashMap::is_empty")]
    pub tag_filters: HashMap<String, String>,
}

impl ResourceFilter {
    /// Create an empty filter (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by exact resource type
    pub fn with_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Require a tag value
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tag_filters.insert(key.into(), value.into());
        self
    }
}

/// What to enumerate from the cloud side; filters combine with OR
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryScope {
    #[serde(rename = "vpcId")]
    pub vpc_id: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, rename = "resourceFilters", skip_serializing_if = "Vec::is_empty")]
    pub resource_filters: Vec<ResourceFilter>,
}

/// Resources and relations produced by one mapping or discovery call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedResources {
    pub resources: Vec<Resource>,
    pub relations: Vec<Relation>,
}

impl MappedResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another batch, keeping order
    pub fn extend(&mut self, other: MappedResources) {
        self.resources.extend(other.resources);
        self.relations.extend(other.relations);
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.relations.is_empty()
    }
}
