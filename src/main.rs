use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vpc_importer::commands::{AnalyzeCommand, ImportCommand};
use vpc_importer::context::Context;

#[derive(Parser)]
#[command(name = "vpc-importer")]
#[command(about = "Generate Terraform HCL and import scripts for existing VPC resources", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover VPC resources and generate HCL plus an import script
    Import(ImportCommand),

    /// List resources already declared in a Terraform directory
    Analyze(AnalyzeCommand),
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let ctx = Context::new();

    match cli.command {
        Commands::Import(cmd) => cmd.execute(&ctx)?,
        Commands::Analyze(cmd) => cmd.execute(&ctx)?,
    }

    Ok(())
}
