//! Terraform logical name generation
//!
//! One [`NameGenerator`] is owned by each import run and passed by `&mut`
//! into every naming call, so names stay unique across all resource types
//! in the generated output while independent runs never share state.

use std::collections::{HashMap, HashSet};

/// Number of trailing native-id characters used when no `Name` label exists
const SHORT_ID_LEN: usize = 12;

/// Collision-free Terraform logical name generator
#[derive(Debug, Default)]
pub struct NameGenerator {
    /// Last suffix handed out per sanitized base
    suffixes: HashMap<String, usize>,
    /// Every name returned so far
    issued: HashSet<String>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a logical name for a resource
    ///
    /// The base is the `Name` label when present and non-empty, otherwise
    /// `<type>_<last 12 chars of native id>`. The first use of a sanitized
    /// base returns it unchanged; later collisions return `base_1`, `base_2`, ...
    pub fn generate(
        &mut self,
        resource_type: &str,
        labels: &HashMap<String, String>,
        native_id: &str,
    ) -> String {
        let base = match labels.get("Name") {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{}_{}", resource_type, short_id(native_id)),
        };

        self.claim(&sanitize_identifier(&base))
    }

    /// Number of names handed out so far
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    fn claim(&mut self, base: &str) -> String {
        if !self.suffixes.contains_key(base) && !self.issued.contains(base) {
            self.suffixes.insert(base.to_string(), 0);
            self.issued.insert(base.to_string());
            return base.to_string();
        }

        let counter = self.suffixes.entry(base.to_string()).or_insert(0);

        // A suffixed candidate may already exist as someone else's plain base.
        loop {
            *counter += 1;
            let candidate = format!("{}_{}", base, counter);

            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

fn short_id(native_id: &str) -> &str {
    let len = native_id.chars().count();

    if len <= SHORT_ID_LEN {
        return native_id;
    }

    match native_id.char_indices().nth(len - SHORT_ID_LEN) {
        Some((idx, _)) => &native_id[idx..],
        None => native_id,
    }
}

/// Normalize a string into a valid Terraform identifier
///
/// Lowercases, turns every run of characters outside `[a-z0-9_]` into one `_`,
/// trims and collapses underscores, prefixes `r_` when the result starts with
/// a digit and falls back to `resource` when nothing is left.
pub fn sanitize_identifier(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut out = String::with_capacity(lowered.len());

    for c in lowered.chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '_'
        };

        if c == '_' && out.ends_with('_') {
            continue;
        }

        out.push(c);
    }

    let trimmed = out.trim_matches('_');

    if trimmed.is_empty() {
        return "resource".to_string();
    }

    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("r_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_labels(name: &str) -> HashMap<String, String> {
        let mut labels = HashMap::new();
        labels.insert("Name".to_string(), name.to_string());
        labels
    }

    #[test]
    fn test_name_from_name_label() {
        let mut names = NameGenerator::new();
        let name = names.generate("aws_instance", &name_labels("Web-Server 01"), "i-0123456789abcdef0");

        assert_eq!(name, "web_server_01");
    }

    #[test]
    fn test_fallback_to_type_and_short_id() {
        let mut names = NameGenerator::new();
        let name = names.generate("aws_instance", &HashMap::new(), "i-0123456789abcdef0");

        assert_eq!(name, "aws_instance_56789abcdef0");
    }

    #[test]
    fn test_short_native_id_used_whole() {
        let mut names = NameGenerator::new();
        let name = names.generate("aws_vpc", &HashMap::new(), "vpc-1");

        assert_eq!(name, "aws_vpc_vpc_1");
    }

    #[test]
    fn test_empty_name_label_is_ignored() {
        let mut names = NameGenerator::new();
        let name = names.generate("aws_subnet", &name_labels(""), "subnet-abc");

        assert_eq!(name, "aws_subnet_subnet_abc");
    }

    #[test]
    fn test_duplicate_names_get_suffix() {
        let mut names = NameGenerator::new();
        let labels = name_labels("app");

        assert_eq!(names.generate("aws_instance", &labels, "i-1"), "app");
        assert_eq!(names.generate("aws_instance", &labels, "i-2"), "app_1");
        assert_eq!(names.generate("aws_instance", &labels, "i-3"), "app_2");
    }

    #[test]
    fn test_collisions_span_resource_types() {
        let mut names = NameGenerator::new();
        let labels = name_labels("shared");

        assert_eq!(names.generate("aws_subnet", &labels, "subnet-1"), "shared");
        assert_eq!(names.generate("aws_instance", &labels, "i-1"), "shared_1");
    }

    #[test]
    fn test_suffix_never_reuses_an_issued_name() {
        let mut names = NameGenerator::new();

        assert_eq!(names.generate("aws_instance", &name_labels("app_1"), "i-0"), "app_1");
        assert_eq!(names.generate("aws_instance", &name_labels("app"), "i-1"), "app");
        assert_eq!(names.generate("aws_instance", &name_labels("app"), "i-2"), "app_2");
        assert_eq!(names.generate("aws_instance", &name_labels("app_1"), "i-3"), "app_1_1");
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_independent_generators_do_not_share_state() {
        let mut first = NameGenerator::new();
        let mut second = NameGenerator::new();
        let labels = name_labels("web");

        assert_eq!(first.generate("aws_instance", &labels, "i-1"), "web");
        assert_eq!(second.generate("aws_instance", &labels, "i-1"), "web");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("my-vpc"), "my_vpc");
        assert_eq!(sanitize_identifier("My VPC"), "my_vpc");
        assert_eq!(sanitize_identifier("123-vpc"), "r_123_vpc");
        assert_eq!(sanitize_identifier("___test___"), "test");
        assert_eq!(sanitize_identifier("a--__--b"), "a_b");
        assert_eq!(sanitize_identifier("---"), "resource");
        assert_eq!(sanitize_identifier(""), "resource");
        assert_eq!(sanitize_identifier("  web  "), "web");
        assert_eq!(sanitize_identifier("_1a"), "r_1a");
        assert_eq!(sanitize_identifier("Café"), "caf");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "Web-Server 01",
            "_1a",
            "123",
            "---",
            "",
            "r_1",
            "ÄÖÜ name",
            "a__b__",
            "i-0123456789abcdef0",
            "__9__",
        ];

        for input in inputs {
            let once = sanitize_identifier(input);
            assert_eq!(sanitize_identifier(&once), once, "input: {:?}", input);
        }
    }
}
