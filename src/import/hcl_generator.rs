//! HCL generation for discovered resources
//!
//! Resources are grouped by type into one `<type>.tf` file each. Types,
//! resource names, attribute keys and tag keys are all sorted so that
//! regenerating from the same graph yields byte-identical files.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::infrastructure::error::{ImportError, ImportResult};
use crate::infrastructure::model::{AttributeValue, Relation, RelationKind, Resource};
use crate::infrastructure::resource_mapper::{AWS_SECURITY_GROUP, AWS_SUBNET};

/// The one map-valued attribute rendered as a nested HCL map
pub const TAGS_ATTRIBUTE: &str = "tags";

/// How generated resources are distributed over files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// One file per resource type
    #[default]
    ByType,
    /// One file per module (not implemented)
    ByModule,
    /// Everything in a single file (not implemented)
    Single,
}

impl SplitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitStrategy::ByType => "by_type",
            SplitStrategy::ByModule => "by_module",
            SplitStrategy::Single => "single",
        }
    }
}

impl std::str::FromStr for SplitStrategy {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "by_type" => Ok(SplitStrategy::ByType),
            "by_module" => Ok(SplitStrategy::ByModule),
            "single" => Ok(SplitStrategy::Single),
            other => Err(ImportError::UnsupportedSplitStrategy(other.to_string())),
        }
    }
}

impl std::fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings for one HCL generation run
#[derive(Debug, Clone, Default)]
pub struct HclGenerationConfig {
    /// Terraform working directory; output goes to `<tf_dir>/generated` unless `output_dir` is set
    pub tf_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub split_strategy: SplitStrategy,
}

impl HclGenerationConfig {
    pub fn new(tf_dir: impl Into<PathBuf>) -> Self {
        Self {
            tf_dir: Some(tf_dir.into()),
            ..Default::default()
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_split_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.split_strategy = strategy;
        self
    }

    /// Resolve the directory files will be written to
    pub fn resolve_output_dir(&self) -> ImportResult<PathBuf> {
        if let Some(dir) = self.output_dir.as_ref().filter(|d| !d.as_os_str().is_empty()) {
            return Ok(dir.clone());
        }

        match self.tf_dir.as_ref().filter(|d| !d.as_os_str().is_empty()) {
            Some(tf_dir) => Ok(tf_dir.join("generated")),
            None => Err(ImportError::InvalidInput(
                "tf_dir is required when output_dir is empty".to_string(),
            )),
        }
    }
}

/// What a generation run wrote
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HclGenerationResult {
    pub output_dir: PathBuf,
    pub generated_files: Vec<PathBuf>,
    /// Resource count per type
    pub resource_counts: BTreeMap<String, usize>,
}

/// Attribute rewritten when a relation of `kind` points at a resource of `target_type`
struct ReferenceRule {
    kind: RelationKind,
    target_type: &'static str,
    attribute: &'static str,
    list: bool,
}

const REFERENCE_RULES: &[ReferenceRule] = &[
    ReferenceRule {
        kind: RelationKind::Network,
        target_type: AWS_SUBNET,
        attribute: "subnet_id",
        list: false,
    },
    ReferenceRule {
        kind: RelationKind::Security,
        target_type: AWS_SECURITY_GROUP,
        attribute: "vpc_security_group_ids",
        list: true,
    },
];

/// Generates HCL `resource` blocks from the resource graph
#[derive(Debug, Clone, Copy, Default)]
pub struct HclGenerator;

impl HclGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Write HCL for `resources`, resolving `relations` into references
    pub fn generate(
        &self,
        resources: &[Resource],
        relations: &[Relation],
        config: &HclGenerationConfig,
    ) -> ImportResult<HclGenerationResult> {
        if config.split_strategy != SplitStrategy::ByType {
            return Err(ImportError::UnsupportedSplitStrategy(
                config.split_strategy.to_string(),
            ));
        }

        let output_dir = config.resolve_output_dir()?;

        std::fs::create_dir_all(&output_dir).map_err(|e| ImportError::fs(&output_dir, e))?;

        self.generate_by_type(resources, relations, &output_dir)
    }

    fn generate_by_type(
        &self,
        resources: &[Resource],
        relations: &[Relation],
        output_dir: &Path,
    ) -> ImportResult<HclGenerationResult> {
        let mut by_type: BTreeMap<&str, Vec<&Resource>> = BTreeMap::new();
        for resource in resources {
            by_type.entry(resource.resource_type.as_str()).or_default().push(resource);
        }

        let relations_by_from = group_relations_by_from(relations);
        let resources_by_id = index_resources_by_id(resources);

        let mut result = HclGenerationResult {
            output_dir: output_dir.to_path_buf(),
            ..Default::default()
        };

        for (resource_type, mut group) in by_type {
            group.sort_by(|a, b| a.name.cmp(&b.name));

            let blocks: Vec<String> = group
                .iter()
                .map(|r| render_resource_block(r, &relations_by_from, &resources_by_id))
                .collect();

            let content = format!("{}\n", blocks.join("\n\n").trim_end());
            let path = output_dir.join(format!("{}.tf", resource_type));

            std::fs::write(&path, content).map_err(|e| ImportError::fs(&path, e))?;

            tracing::debug!(file = %path.display(), resources = group.len(), "wrote HCL file");

            result
                .resource_counts
                .insert(resource_type.to_string(), group.len());
            result.generated_files.push(path);
        }

        Ok(result)
    }
}

fn group_relations_by_from(relations: &[Relation]) -> HashMap<&str, Vec<&Relation>> {
    let mut grouped: HashMap<&str, Vec<&Relation>> = HashMap::new();
    for relation in relations {
        grouped.entry(relation.from.as_str()).or_default().push(relation);
    }
    grouped
}

fn index_resources_by_id(resources: &[Resource]) -> HashMap<&str, &Resource> {
    resources.iter().map(|r| (r.id.as_str(), r)).collect()
}

/// Copy a resource's attributes and replace raw ids with references where
/// a relation points at a resource in the current set
pub fn resolve_attributes(
    resource: &Resource,
    relations_by_from: &HashMap<&str, Vec<&Relation>>,
    resources_by_id: &HashMap<&str, &Resource>,
) -> BTreeMap<String, AttributeValue> {
    let mut attrs = resource.attributes.clone();
    let mut lists: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();

    let Some(relations) = relations_by_from.get(resource.id.as_str()) else {
        return attrs;
    };

    for relation in relations {
        let Some(target) = resources_by_id.get(relation.to.as_str()) else {
            tracing::debug!(from = %relation.from, to = %relation.to, "relation target not in resource set");
            continue;
        };

        for rule in REFERENCE_RULES {
            if rule.kind != relation.kind || rule.target_type != target.resource_type {
                continue;
            }

            if rule.list {
                lists.entry(rule.attribute).or_default().push(target.id_expression());
            } else {
                attrs.insert(rule.attribute.to_string(), AttributeValue::reference_to(target));
            }
        }
    }

    for (attribute, exprs) in lists {
        attrs.insert(attribute.to_string(), AttributeValue::ReferenceList(exprs));
    }

    attrs
}

fn render_resource_block(
    resource: &Resource,
    relations_by_from: &HashMap<&str, Vec<&Relation>>,
    resources_by_id: &HashMap<&str, &Resource>,
) -> String {
    let attrs = resolve_attributes(resource, relations_by_from, resources_by_id);

    let mut out = format!(
        "resource {} {} {{\n",
        quote(&resource.resource_type),
        quote(&resource.name)
    );

    // BTreeMap iteration is already key-sorted
    for (key, value) in &attrs {
        if let Some(rendered) = render_attribute(key, value) {
            out.push_str(&rendered);
        }
    }

    out.push('}');
    out
}

/// Render one attribute as indented HCL line(s), `None` for null values
pub fn render_attribute(key: &str, value: &AttributeValue) -> Option<String> {
    let line = match value {
        AttributeValue::Null => return None,
        AttributeValue::String(s) => format!("{} = {}", key, quote(s)),
        AttributeValue::Bool(b) => format!("{} = {}", key, b),
        AttributeValue::Number(n) => format!("{} = {}", key, n),
        AttributeValue::Reference(expr) => format!("{} = {}", key, expr),
        AttributeValue::StringList(items) => {
            let parts: Vec<String> = items.iter().map(|s| quote(s)).collect();
            format!("{} = [{}]", key, parts.join(", "))
        }
        AttributeValue::ReferenceList(exprs) => format!("{} = [{}]", key, exprs.join(", ")),
        AttributeValue::Map(map) if key == TAGS_ATTRIBUTE => {
            let mut block = format!("  {} = {{\n", key);
            for (k, v) in map {
                block.push_str(&format!("    {} = {}\n", quote(k), quote(v)));
            }
            block.push_str("  }\n");
            return Some(block);
        }
        // Only tags get the nested map form
        AttributeValue::Map(map) => match serde_json::to_string(map) {
            Ok(json) => format!("# {} = {}", key, json),
            Err(_) => format!("# {} = {:?}", key, map),
        },
        AttributeValue::Opaque(value) => format!("# {} = {}", key, value),
    };

    Some(format!("  {}\n", line))
}

/// Quote a string as an HCL string literal
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');

    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }

    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::model::Origin;
    use std::fs;
    use tempfile::TempDir;

    fn subnet() -> Resource {
        Resource::new("aws", "aws_subnet", "subnet-1234", "subnet_public_a", Origin::Cloud)
            .with_attribute("id", "subnet-1234")
            .with_attribute("cidr_block", "10.0.1.0/24")
    }

    fn security_group(native_id: &str, name: &str) -> Resource {
        Resource::new("aws", "aws_security_group", native_id, name, Origin::Cloud)
            .with_attribute("id", native_id)
    }

    fn instance() -> Resource {
        Resource::new("aws", "aws_instance", "i-1234", "web_1", Origin::Cloud)
            .with_attribute("id", "i-1234")
            .with_attribute("ami", "ami-aaaa")
            .with_attribute("instance_type", "t3.micro")
            .with_attribute("subnet_id", "subnet-1234")
            .with_attribute("vpc_security_group_ids", vec!["sg-1".to_string()])
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_generate_by_type_with_subnet_reference() {
        let dir = TempDir::new().unwrap();
        let subnet = subnet();
        let instance = instance();
        let relations = vec![Relation::new(&instance.id, &subnet.id, RelationKind::Network)];

        let result = HclGenerator::new()
            .generate(&[subnet, instance], &relations, &HclGenerationConfig::new(dir.path()))
            .unwrap();

        assert_eq!(result.output_dir, dir.path().join("generated"));
        assert_eq!(
            result.generated_files,
            vec![
                dir.path().join("generated/aws_instance.tf"),
                dir.path().join("generated/aws_subnet.tf"),
            ]
        );
        assert_eq!(result.resource_counts.get("aws_instance"), Some(&1));
        assert_eq!(result.resource_counts.get("aws_subnet"), Some(&1));

        let text = read(&result.output_dir.join("aws_instance.tf"));
        assert!(text.contains("  subnet_id = aws_subnet.subnet_public_a.id\n"));
        assert!(!text.contains("\"subnet-1234\""));
        // No security group in the set, so the raw list stays
        assert!(text.contains("  vpc_security_group_ids = [\"sg-1\"]\n"));
    }

    #[test]
    fn test_security_group_references_replace_raw_list() {
        let dir = TempDir::new().unwrap();
        let sg_web = security_group("sg-1", "sg_web");
        let sg_ssh = security_group("sg-2", "sg_ssh");
        let instance = instance();
        let relations = vec![
            Relation::new(&instance.id, &sg_web.id, RelationKind::Security),
            Relation::new(&instance.id, &sg_ssh.id, RelationKind::Security),
            Relation::new(&instance.id, "aws:aws_security_group:sg-404", RelationKind::Security),
        ];

        let result = HclGenerator::new()
            .generate(&[instance, sg_web, sg_ssh], &relations, &HclGenerationConfig::new(dir.path()))
            .unwrap();

        let text = read(&result.output_dir.join("aws_instance.tf"));
        assert!(text.contains(
            "  vpc_security_group_ids = [aws_security_group.sg_web.id, aws_security_group.sg_ssh.id]\n"
        ));
        // Dangling subnet relation target: raw id kept
        assert!(text.contains("  subnet_id = \"subnet-1234\"\n"));
    }

    #[test]
    fn test_rule_requires_matching_target_type() {
        let vpc = Resource::new("aws", "aws_vpc", "vpc-1", "main", Origin::Cloud);
        let instance = instance();
        let relations = vec![Relation::new(&instance.id, &vpc.id, RelationKind::Network)];
        let resources = vec![vpc, instance.clone()];

        let by_from = group_relations_by_from(&relations);
        let by_id = index_resources_by_id(&resources);
        let attrs = resolve_attributes(&instance, &by_from, &by_id);

        assert_eq!(
            attrs.get("subnet_id"),
            Some(&AttributeValue::String("subnet-1234".to_string()))
        );
    }

    #[test]
    fn test_input_graph_is_not_mutated() {
        let subnet = subnet();
        let instance = instance();
        let relations = vec![Relation::new(&instance.id, &subnet.id, RelationKind::Network)];
        let resources = vec![subnet, instance.clone()];

        let by_from = group_relations_by_from(&relations);
        let by_id = index_resources_by_id(&resources);
        let attrs = resolve_attributes(&resources[1], &by_from, &by_id);

        assert_eq!(
            attrs.get("subnet_id"),
            Some(&AttributeValue::Reference("aws_subnet.subnet_public_a.id".to_string()))
        );
        assert_eq!(resources[1], instance);
    }

    #[test]
    fn test_block_layout_is_sorted_and_stable() {
        let dir = TempDir::new().unwrap();
        let mut tags = BTreeMap::new();
        tags.insert("Name".to_string(), "b".to_string());
        tags.insert("Env".to_string(), "prod".to_string());

        let b = Resource::new("aws", "aws_vpc", "vpc-b", "b", Origin::Cloud)
            .with_attribute("id", "vpc-b")
            .with_attribute("enable_dns_support", true)
            .with_attribute("tags", tags)
            .with_attribute("cidr_block", "10.1.0.0/16")
            .with_attribute("ignored", AttributeValue::Null);
        let a = Resource::new("aws", "aws_vpc", "vpc-a", "a", Origin::Cloud)
            .with_attribute("id", "vpc-a")
            .with_attribute("max_azs", 3i64);

        let config = HclGenerationConfig::default().with_output_dir(dir.path().join("out"));
        let result = HclGenerator::new().generate(&[b, a], &[], &config).unwrap();

        let expected = "resource \"aws_vpc\" \"a\" {\n  id = \"vpc-a\"\n  max_azs = 3\n}\n\nresource \"aws_vpc\" \"b\" {\n  cidr_block = \"10.1.0.0/16\"\n  enable_dns_support = true\n  id = \"vpc-b\"\n  tags = {\n    \"Env\" = \"prod\"\n    \"Name\" = \"b\"\n  }\n}\n";

        assert_eq!(result.output_dir, dir.path().join("out"));
        assert_eq!(read(&result.output_dir.join("aws_vpc.tf")), expected);
        assert_eq!(result.resource_counts.get("aws_vpc"), Some(&2));
    }

    #[test]
    fn test_opaque_values_render_as_comment() {
        let rendered = render_attribute(
            "ingress",
            &AttributeValue::Opaque(serde_json::json!({"from_port": 22})),
        )
        .unwrap();

        assert!(rendered.starts_with("  # ingress = "));
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn test_non_tags_map_renders_as_comment() {
        let map: BTreeMap<String, String> = [("b".to_string(), "2".to_string()), ("a".to_string(), "1".to_string())]
            .into_iter()
            .collect();

        let rendered = render_attribute("metadata", &AttributeValue::Map(map.clone())).unwrap();
        assert_eq!(rendered, "  # metadata = {\"a\":\"1\",\"b\":\"2\"}\n");

        let tags = render_attribute(TAGS_ATTRIBUTE, &AttributeValue::Map(map)).unwrap();
        assert_eq!(tags, "  tags = {\n    \"a\" = \"1\"\n    \"b\" = \"2\"\n  }\n");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a \"b\"\n"), "\"a \\\"b\\\"\\n\"");
        assert_eq!(quote("c:\\tmp"), "\"c:\\\\tmp\"");
    }

    #[test]
    fn test_unsupported_split_strategy_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = HclGenerationConfig::new(dir.path()).with_split_strategy(SplitStrategy::Single);

        let result = HclGenerator::new().generate(&[subnet()], &[], &config);

        assert!(matches!(result, Err(ImportError::UnsupportedSplitStrategy(_))));
        assert!(!dir.path().join("generated").exists());
    }

    #[test]
    fn test_missing_tf_dir_is_input_error() {
        let result = HclGenerator::new().generate(&[subnet()], &[], &HclGenerationConfig::default());

        match result {
            Err(err) => assert!(err.is_input_error()),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_split_strategy_parsing() {
        assert_eq!("by_type".parse::<SplitStrategy>().unwrap(), SplitStrategy::ByType);
        assert_eq!("".parse::<SplitStrategy>().unwrap(), SplitStrategy::ByType);
        assert_eq!("single".parse::<SplitStrategy>().unwrap(), SplitStrategy::Single);
        assert!(matches!(
            "by_region".parse::<SplitStrategy>(),
            Err(ImportError::UnsupportedSplitStrategy(_))
        ));
    }

    #[test]
    fn test_empty_resource_set_writes_no_files() {
        let dir = TempDir::new().unwrap();
        let result = HclGenerator::new()
            .generate(&[], &[], &HclGenerationConfig::new(dir.path()))
            .unwrap();

        assert!(result.generated_files.is_empty());
        assert!(result.output_dir.is_dir());
    }
}
