//! File catalog management commands.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use fileshelf_core::config::AppConfig;
use fileshelf_core::error::AppError;
use fileshelf_core::types::PageRequest;
use fileshelf_service::file::service::{FileService, UploadRequest, UploadedFile};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FilesArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FilesCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    /// List files in the catalog
    List {
        /// Restrict to one owner
        #[arg(short, long)]
        owner: Option<String>,
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u64,
        /// Items per page
        #[arg(long, default_value_t = 30)]
        page_size: u64,
    },
    /// Show a single file
    Show {
        /// File ID
        id: i64,
    },
    /// Upload a file from disk
    Upload {
        /// Path to the file to upload
        path: PathBuf,
        /// Owner to store the file under
        #[arg(short, long)]
        owner: String,
        /// Description
        #[arg(short, long)]
        description: String,
        /// MIME type
        #[arg(short, long, default_value = "application/octet-stream")]
        mimetype: String,
    },
    /// Delete a file by ID
    Delete {
        /// File ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// File display row for table output
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: i64,
    /// Stored filename
    filename: String,
    /// Version within the duplicate family
    version: i64,
    /// Owner
    owner: String,
    /// MIME type
    mimetype: String,
}

/// Detail view for a single file; the payload is summarized, not dumped.
#[derive(Debug, Serialize)]
struct FileDetails {
    id: i64,
    description: String,
    filename: String,
    mimetype: String,
    owner: String,
    canonical_key: String,
    version: i64,
    payload_length: usize,
}

impl FileDetails {
    /// Labelled rows for the table view.
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("filename", self.filename.clone()),
            ("version", self.version.to_string()),
            ("owner", self.owner.clone()),
            ("mimetype", self.mimetype.clone()),
            ("description", self.description.clone()),
            ("canonical_key", self.canonical_key.clone()),
            ("payload_length", format!("{} bytes", self.payload_length)),
        ]
    }
}

/// Execute file commands
pub async fn execute(
    args: &FilesArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let service = FileService::bootstrap(config).await?;

    match &args.command {
        FilesCommand::List {
            owner,
            page,
            page_size,
        } => {
            let request = PageRequest::new(*page, *page_size);
            let response = match owner {
                Some(owner) => service.list(owner, request).await?,
                None => service.list_all(request).await?,
            };

            let rows: Vec<FileRow> = response
                .items
                .iter()
                .map(|f| FileRow {
                    id: f.id,
                    filename: f.filename.clone(),
                    version: f.version,
                    owner: f.owner.clone(),
                    mimetype: f.mimetype.clone(),
                })
                .collect();

            output::print_list(&rows, format);
            if response.total_pages > 1 {
                println!(
                    "Page {} of {} ({} files total)",
                    response.page, response.total_pages, response.total_items
                );
            }
        }
        FilesCommand::Show { id } => {
            let record = service.get(*id).await?;
            let details = FileDetails {
                id: record.id,
                description: record.description,
                filename: record.filename,
                mimetype: record.mimetype,
                owner: record.owner,
                canonical_key: record.canonical_key.to_string(),
                version: record.version,
                payload_length: record.payload.len(),
            };
            output::print_detail(&details, &details.rows(), format);
        }
        FilesCommand::Upload {
            path,
            owner,
            description,
            mimetype,
        } => {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    AppError::validation(format!("Path '{}' has no usable filename", path.display()))
                })?;
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                AppError::internal(format!("Failed to read '{}': {}", path.display(), e))
            })?;

            let record = service
                .upload(UploadRequest {
                    description: description.clone(),
                    file: UploadedFile {
                        name: name.to_string(),
                        mimetype: mimetype.clone(),
                        payload: BASE64.encode(&bytes),
                    },
                    owner: owner.clone(),
                })
                .await?;

            output::print_success(&format!(
                "Stored '{}' as '{}' (id {}, version {})",
                name, record.filename, record.id, record.version
            ));
        }
        FilesCommand::Delete { id, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete file {}?", id))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            if service.delete(*id).await? {
                output::print_success(&format!("File {} deleted", id));
            } else {
                output::print_error(&format!("No file with id {}", id));
            }
        }
    }

    Ok(())
}
