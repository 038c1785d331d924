//! CLI command definitions and dispatch.

pub mod files;
pub mod migrate;
pub mod seed;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use fileshelf_core::config::AppConfig;
use fileshelf_core::error::AppError;

/// Fileshelf — versioned file catalog
#[derive(Debug, Parser)]
#[command(name = "fileshelf", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (merges config/{env}.toml over config/default.toml)
    #[arg(short, long, default_value = "local")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Catalog schema management
    Migrate(migrate::MigrateArgs),
    /// Load demo data into the catalog
    Seed(seed::SeedArgs),
    /// File catalog management
    Files(files::FilesArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config).await,
            Commands::Seed(args) => seed::execute(args, config).await,
            Commands::Files(args) => files::execute(args, config, self.format).await,
        }
    }
}
