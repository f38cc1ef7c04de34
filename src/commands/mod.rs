pub mod analyze;
pub mod import;

pub use analyze::AnalyzeCommand;
pub use import::ImportCommand;
