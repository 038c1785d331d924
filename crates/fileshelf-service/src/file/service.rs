//! Core file catalog operations: upload with collision-free naming,
//! listing, lookup, and deletion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use fileshelf_core::config::{AppConfig, CatalogConfig};
use fileshelf_core::error::{AppError, ErrorKind};
use fileshelf_core::result::AppResult;
use fileshelf_core::types::pagination::{PageRequest, PageResponse};
use fileshelf_database::CatalogPool;
use fileshelf_database::migration;
use fileshelf_database::repositories::file::FileRepository;
use fileshelf_entity::file::{CanonicalKey, FileName, FileRecord, NewFileRecord};

use crate::file::naming::{self, UploadPlan};

/// Metadata and content of a file being uploaded.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadedFile {
    /// Desired file name.
    #[validate(length(min = 1, message = "File name is required"))]
    pub name: String,
    /// Declared MIME type.
    #[validate(length(min = 1, message = "MIME type is required"))]
    pub mimetype: String,
    /// Opaque content surrogate (e.g. base64-encoded data).
    #[validate(length(min = 1, message = "File payload is required"))]
    pub payload: String,
}

/// Request to store a file in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadRequest {
    /// Free-form description of the file.
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// The file being uploaded.
    #[validate(nested)]
    pub file: UploadedFile,
    /// The identity the file is stored under.
    #[validate(length(min = 1, message = "Owner is required"))]
    pub owner: String,
}

/// Handles file catalog use cases on top of the repository layer.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// How many times an upload is re-planned after losing a version
    /// slot to a concurrent insert.
    insert_retries: u32,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(file_repo: Arc<FileRepository>, catalog: &CatalogConfig) -> Self {
        Self {
            file_repo,
            insert_retries: catalog.insert_retries,
        }
    }

    /// Wire a ready-to-use service from configuration.
    ///
    /// Connects the catalog pool and evolves the schema exactly once.
    /// A schema failure is fatal: the embedding process must not serve
    /// uploads against a half-evolved catalog.
    pub async fn bootstrap(config: &AppConfig) -> AppResult<Self> {
        let pool = CatalogPool::connect(&config.database).await?;
        migration::ensure_schema(pool.pool()).await?;
        let file_repo = Arc::new(FileRepository::new(pool.into_pool()));
        Ok(Self::new(file_repo, &config.catalog))
    }

    /// Store an uploaded file under a collision-free name.
    ///
    /// The desired name is parsed, its family's occupied versions are
    /// read, and the naming policy picks the slot. The insert is guarded
    /// by the unique `(owner, canonical_key, version)` index: losing the
    /// slot to a concurrent upload triggers a bounded re-plan, after
    /// which the conflict is surfaced to the caller.
    pub async fn upload(&self, request: UploadRequest) -> AppResult<FileRecord> {
        request
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid upload request: {e}")))?;

        let name = FileName::parse(&request.file.name);
        let family_key = CanonicalKey::of(&name);

        let mut attempt = 0;
        loop {
            let family = self
                .file_repo
                .find_versions_by_key(&request.owner, &family_key)
                .await?;

            let plan = match naming::plan_upload(&name, &family) {
                UploadPlan::Resolved(plan) => plan,
                UploadPlan::MarkerCollision { literal_key } => {
                    let literal_family = self
                        .file_repo
                        .find_versions_by_key(&request.owner, &literal_key)
                        .await?;
                    naming::plan_literal_upload(&name, &literal_family)
                }
            };

            let record = NewFileRecord {
                description: request.description.clone(),
                filename: plan.filename,
                mimetype: request.file.mimetype.clone(),
                payload: request.file.payload.clone(),
                owner: request.owner.clone(),
                canonical_key: plan.key,
                version: plan.version,
            };

            match self.file_repo.insert(&record).await {
                Ok(stored) => {
                    info!(
                        id = stored.id,
                        owner = %stored.owner,
                        filename = %stored.filename,
                        version = stored.version,
                        "File stored"
                    );
                    return Ok(stored);
                }
                Err(err) if err.kind == ErrorKind::Conflict && attempt < self.insert_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        filename = %request.file.name,
                        "Version slot taken concurrently, re-planning"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// List an owner's files with pagination.
    pub async fn list(
        &self,
        owner: &str,
        page: PageRequest,
    ) -> AppResult<PageResponse<FileRecord>> {
        self.file_repo.find_by_owner(owner, &page).await
    }

    /// List the whole catalog with pagination.
    pub async fn list_all(&self, page: PageRequest) -> AppResult<PageResponse<FileRecord>> {
        self.file_repo.find_all(&page).await
    }

    /// Get a single file by ID.
    pub async fn get(&self, id: i64) -> AppResult<FileRecord> {
        self.file_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    /// Delete a file by ID. Returns whether a record was removed.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let removed = self.file_repo.delete_by_id(id).await?;
        if removed {
            info!(id, "File deleted");
        }
        Ok(removed)
    }
}
