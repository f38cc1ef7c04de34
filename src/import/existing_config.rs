use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::infrastructure::error::{ImportError, ImportResult};
use crate::infrastructure::model::Resource;

lazy_static! {
    /// `resource "<type>" "<name>"` at the start of a line
    static ref RESOURCE_HEADER: Regex =
        Regex::new(r#"^\s*resource\s+"([^"]+)"\s+"([^"]+)""#).unwrap();
}

/// Identity of a declared resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub provider: String,
    pub resource_type: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(provider: impl Into<String>, resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    pub fn for_resource(resource: &Resource) -> Self {
        Self::new(&resource.provider, &resource.resource_type, &resource.name)
    }

    /// Terraform address, `<type>.<name>`
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }
}

/// Where a resource is declared in the existing tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingResourceMeta {
    pub file_path: PathBuf,
    /// 1-based line of the `resource` header
    pub line: usize,
}

impl std::fmt::Display for ExistingResourceMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file_path.display(), self.line)
    }
}

/// First-seen location of every resource declared in a `.tf` tree
#[derive(Debug, Clone, Default)]
pub struct ExistingConfigIndex {
    resources: HashMap<ResourceKey, ExistingResourceMeta>,
}

impl ExistingConfigIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration unless the key was already seen
    pub fn insert(&mut self, key: ResourceKey, meta: ExistingResourceMeta) -> bool {
        if self.resources.contains_key(&key) {
            return false;
        }

        self.resources.insert(key, meta);
        true
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&ExistingResourceMeta> {
        self.resources.get(key)
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.resources.contains_key(key)
    }

    /// Entries sorted by key
    pub fn entries(&self) -> Vec<(&ResourceKey, &ExistingResourceMeta)> {
        let mut entries: Vec<_> = self.resources.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// A candidate resource that is already declared in the existing tree
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictedResource {
    pub imported: Resource,
    pub existing: ExistingResourceMeta,
}

/// Candidates split by whether they already exist in configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConflictReport {
    pub importable: Vec<Resource>,
    pub conflicted: Vec<ConflictedResource>,
}

/// Indexes resource declarations found under a Terraform directory
///
/// This is a line-oriented scan, not an HCL parser: a declaration is only
/// recognized when its `resource "<type>" "<name>"` header leads a single
/// line. Headers split across lines or preceded by a comment on the same
/// line are missed.
pub struct ExistingConfigAnalyzer {
    extension: String,
}

impl ExistingConfigAnalyzer {
    pub fn new() -> Self {
        Self {
            extension: "tf".to_string(),
        }
    }

    /// Scan every `.tf` file under `tf_dir` recursively
    ///
    /// Any walk, open or read failure aborts the scan; no partial index is returned.
    pub fn analyze(&self, tf_dir: &Path) -> ImportResult<ExistingConfigIndex> {
        let metadata = std::fs::metadata(tf_dir).map_err(|e| ImportError::fs(tf_dir, e))?;

        if !metadata.is_dir() {
            return Err(ImportError::NotADirectory(tf_dir.to_path_buf()));
        }

        let mut index = ExistingConfigIndex::new();

        for entry in WalkDir::new(tf_dir).sort_by_file_name() {
            let entry = entry?;

            // Symlinked files are opened through the link
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();

            if path.extension().is_none_or(|ext| ext != self.extension.as_str()) {
                continue;
            }

            let added = self.index_file(path, &mut index)?;
            tracing::debug!(file = %path.display(), added, "indexed configuration file");
        }

        Ok(index)
    }

    /// Index one file, returning how many new keys it contributed
    fn index_file(&self, path: &Path, index: &mut ExistingConfigIndex) -> ImportResult<usize> {
        let file = File::open(path).map_err(|e| ImportError::fs(path, e))?;
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut line_no = 0;
        let mut added = 0;

        // Byte-oriented so non-UTF-8 content (e.g. Latin-1 comments) does not abort the scan
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| ImportError::fs(path, e))?;
            if read == 0 {
                break;
            }
            line_no += 1;

            let line = String::from_utf8_lossy(&buf);
            let Some(caps) = RESOURCE_HEADER.captures(&line) else {
                continue;
            };

            let resource_type = &caps[1];
            let key = ResourceKey::new(provider_from_type(resource_type), resource_type, &caps[2]);
            let meta = ExistingResourceMeta {
                file_path: path.to_path_buf(),
                line: line_no,
            };

            if index.insert(key, meta) {
                added += 1;
            }
        }

        Ok(added)
    }
}

impl Default for ExistingConfigAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Provider prefix of a resource type (`aws_instance` -> `aws`), empty without `_`
pub fn provider_from_type(resource_type: &str) -> &str {
    resource_type
        .split_once('_')
        .map(|(provider, _)| provider)
        .unwrap_or("")
}

/// Split candidates into importable and already-declared, keeping input order
pub fn filter_conflicted(candidates: &[Resource], index: &ExistingConfigIndex) -> ConflictReport {
    let mut report = ConflictReport::default();

    for resource in candidates {
        match index.get(&ResourceKey::for_resource(resource)) {
            Some(meta) => report.conflicted.push(ConflictedResource {
                imported: resource.clone(),
                existing: meta.clone(),
            }),
            None => report.importable.push(resource.clone()),
        }
    }

    report
}
