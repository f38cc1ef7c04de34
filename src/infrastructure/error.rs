use std::path::PathBuf;

use thiserror::Error;

/// Error types for infrastructure import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// Invalid or missing parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested HCL split strategy has no implementation
    #[error("Split strategy '{0}' is not supported yet")]
    UnsupportedSplitStrategy(String),

    /// Resource filter expression could not be parsed
    #[error("Invalid resource filter: {0}")]
    InvalidFilter(String),

    /// Configuration or inventory file parsing error
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// File system operation failed on a specific path
    #[error("File system error on {}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path was expected to be a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Recursive directory walk failed
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Terraform/OpenTofu command failed
    #[error("Executor command '{command}' failed{}: {message}", .exit_code.map(|c| format!(" (exit code {})", c)).unwrap_or_default())]
    ExecutorFailed {
        command: String,
        message: String,
        exit_code: Option<i32>,
    },

    /// Provider API or inventory source error
    #[error("Provider API error: {0}")]
    ProviderApi(String),

    /// No fetcher knows how to discover this kind
    #[error("Unsupported resource kind: {0}")]
    UnsupportedResourceKind(String),
}

impl ImportError {
    /// Build a file system error for `path`
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportError::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Whether the error stems from a bad parameter (nothing was written)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ImportError::InvalidInput(_)
                | ImportError::UnsupportedSplitStrategy(_)
                | ImportError::InvalidFilter(_)
                | ImportError::ConfigParse(_)
        )
    }

    /// Whether the error stems from the file system
    pub fn is_filesystem_error(&self) -> bool {
        matches!(
            self,
            ImportError::FileSystem { .. } | ImportError::NotADirectory(_) | ImportError::Walk(_)
        )
    }
}

impl From<serde_yaml::Error> for ImportError {
    fn from(err: serde_yaml::Error) -> Self {
        ImportError::ConfigParse(err.to_string())
    }
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;
