use super::error::{ImportError, ImportResult};
use super::model::{Resource, ResourceFilter};

impl ResourceFilter {
    /// Parse a single `--resource-filters` expression
    ///
    /// Example: `type=aws_instance,tag:Env=prod,tag:Owner=team-a`
    pub fn parse(expr: &str) -> ImportResult<Self> {
        let mut filter = ResourceFilter::new();

        for segment in expr.split(',').map(str::trim) {
            if segment.is_empty() {
                continue;
            }

            if let Some(resource_type) = segment.strip_prefix("type=") {
                filter.resource_type = Some(resource_type.trim().to_string());
                continue;
            }

            if let Some(rest) = segment.strip_prefix("tag:") {
                let (key, value) = rest.split_once('=').ok_or_else(|| {
                    ImportError::InvalidFilter(format!("invalid tag filter: {:?}", segment))
                })?;

                let key = key.trim();

                if key.is_empty() {
                    return Err(ImportError::InvalidFilter(format!(
                        "empty tag key in: {:?}",
                        segment
                    )));
                }

                filter
                    .tag_filters
                    .insert(key.to_string(), value.trim().to_string());
                continue;
            }

            return Err(ImportError::InvalidFilter(format!(
                "unknown filter segment: {:?}",
                segment
            )));
        }

        Ok(filter)
    }

    /// Whether a resource satisfies this filter (type AND every tag)
    pub fn matches(&self, resource: &Resource) -> bool {
        if let Some(resource_type) = &self.resource_type
            && !resource_type.is_empty()
            && *resource_type != resource.resource_type
        {
            return false;
        }

        self.tag_filters
            .iter()
            .all(|(key, value)| resource.labels.get(key) == Some(value))
    }
}

/// Whether a resource matches any of the filters; an empty list matches everything
pub fn match_resource(filters: &[ResourceFilter], resource: &Resource) -> bool {
    filters.is_empty() || filters.iter().any(|f| f.matches(resource))
}

/// Parse several filter expressions, skipping blank ones
pub fn parse_filters<S: AsRef<str>>(exprs: &[S]) -> ImportResult<Vec<ResourceFilter>> {
    exprs
        .iter()
        .map(AsRef::as_ref)
        .filter(|e| !e.trim().is_empty())
        .map(ResourceFilter::parse)
        .collect()
}
