//! Catalog schema management commands.

use clap::{Args, Subcommand};

use crate::output;
use fileshelf_core::config::AppConfig;
use fileshelf_core::error::AppError;
use fileshelf_database::connection::CatalogPool;
use fileshelf_database::migration;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Evolve the catalog schema (create table, add columns, backfill, index)
    Run,
    /// Show which schema pieces are present
    Status,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = CatalogPool::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Evolving catalog schema...");
            migration::ensure_schema(pool.pool()).await?;
            output::print_success("Catalog schema is up to date.");
        }
        MigrateCommand::Status => {
            let status = migration::schema_status(pool.pool()).await?;

            println!("Catalog schema status:");
            output::print_row("files table", present(status.files_table));
            output::print_row("canonical_key column", present(status.canonical_key_column));
            output::print_row("version column", present(status.version_column));
            output::print_row("unique version index", present(status.version_index));

            if status.is_current() {
                output::print_success("Schema is current.");
            } else {
                output::print_warning("Schema needs evolution; run `migrate run`.");
            }
        }
    }

    pool.close().await;
    Ok(())
}

fn present(value: bool) -> &'static str {
    if value { "present" } else { "missing" }
}
