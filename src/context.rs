use crate::traits::{CommandExecutor, Output, RealCommandExecutor, TerminalOutput};
#[cfg(test)]
use crate::traits::{MockCommandExecutor, MockOutput};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub output: Arc<dyn Output>,
    pub command: Arc<dyn CommandExecutor>,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new() -> Self {
        Self {
            output: Arc::new(TerminalOutput),
            command: Arc::new(RealCommandExecutor::new()),
        }
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            output: Arc::new(MockOutput::new()),
            command: Arc::new(MockCommandExecutor::new()),
        }
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    pub fn test_with(output: Arc<dyn Output>, command: Arc<dyn CommandExecutor>) -> Self {
        Self { output, command }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            output: Arc::clone(&self.output),
            command: Arc::clone(&self.command),
        }
    }
}
