//! Demo catalog seeding.
//!
//! Feeds a small demo dataset through the normal upload path, so seeded
//! catalogs show versioned filenames instead of hand-written rows.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::Args;

use crate::output;
use fileshelf_core::config::AppConfig;
use fileshelf_core::error::AppError;
use fileshelf_core::types::PageRequest;
use fileshelf_service::file::service::{FileService, UploadRequest, UploadedFile};

/// Owner the demo rows are stored under.
const DEMO_OWNER: &str = "demo";

/// (description, filename, mimetype, content). The repeated kitten.jpg is
/// deliberate: the second copy comes back renamed.
const DEMO_FILES: &[(&str, &str, &str, &str)] = &[
    (
        "Promotional hero image",
        "elvis.jpg",
        "image/jpeg",
        "retro publicity still",
    ),
    ("Office cat", "kitten.jpg", "image/jpeg", "cat photo, take one"),
    (
        "Office cat, better light",
        "kitten.jpg",
        "image/jpeg",
        "cat photo, take two",
    ),
    (
        "Quarterly report",
        "report.pdf",
        "application/pdf",
        "numbers go here",
    ),
    ("Release notes", "CHANGELOG", "text/plain", "initial release"),
];

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Skip the confirmation prompt when the catalog is not empty
    #[arg(long)]
    pub force: bool,
}

/// Execute the seed command
pub async fn execute(args: &SeedArgs, config: &AppConfig) -> Result<(), AppError> {
    let service = FileService::bootstrap(config).await?;

    let existing = service.list_all(PageRequest::default()).await?;
    if existing.total_items > 0 && !args.force {
        output::print_warning(&format!(
            "Catalog already contains {} file(s).",
            existing.total_items
        ));
        let confirm = dialoguer::Confirm::new()
            .with_prompt("Seeding will add demo rows alongside them. Continue?")
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    println!("Inserting seed data...");
    for (description, filename, mimetype, content) in DEMO_FILES {
        let record = service
            .upload(UploadRequest {
                description: description.to_string(),
                file: UploadedFile {
                    name: filename.to_string(),
                    mimetype: mimetype.to_string(),
                    payload: BASE64.encode(content),
                },
                owner: DEMO_OWNER.to_string(),
            })
            .await?;

        println!(
            "  {} -> {} (version {})",
            filename, record.filename, record.version
        );
    }

    output::print_success(&format!(
        "Seeded {} demo files for owner '{}'.",
        DEMO_FILES.len(),
        DEMO_OWNER
    ));
    Ok(())
}
