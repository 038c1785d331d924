//! File catalog repository.

use std::collections::BTreeSet;

use sqlx::SqlitePool;

use fileshelf_core::error::{AppError, ErrorKind};
use fileshelf_core::result::AppResult;
use fileshelf_core::types::pagination::{PageRequest, PageResponse};
use fileshelf_entity::file::{CanonicalKey, FileRecord, NewFileRecord};

/// Repository for file catalog rows.
///
/// Pure persistence: version assignment and naming policy live in the
/// service layer. All queries are scoped by `owner` where the operation
/// is per-owner.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new record and return the persisted row.
    ///
    /// A violation of the unique `(owner, canonical_key, version)` index
    /// surfaces as a conflict so the caller can re-plan the version.
    pub async fn insert(&self, record: &NewFileRecord) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "INSERT INTO files (description, filename, mimetype, payload, owner, canonical_key, version) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING *",
        )
        .bind(&record.description)
        .bind(&record.filename)
        .bind(&record.mimetype)
        .bind(&record.payload)
        .bind(&record.owner)
        .bind(&record.canonical_key)
        .bind(record.version)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.message().contains("UNIQUE constraint") => {
                AppError::conflict(format!(
                    "Version {} of '{}' was assigned concurrently",
                    record.version, record.filename
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert file", e),
        })
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Load the set of versions recorded for a canonical key.
    pub async fn find_versions_by_key(
        &self,
        owner: &str,
        key: &CanonicalKey,
    ) -> AppResult<BTreeSet<i64>> {
        let versions: Vec<i64> =
            sqlx::query_scalar("SELECT version FROM files WHERE owner = ?1 AND canonical_key = ?2")
                .bind(owner)
                .bind(key)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load version family", e)
                })?;
        Ok(versions.into_iter().collect())
    }

    /// List an owner's files with pagination, oldest first.
    pub async fn find_by_owner(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<FileRecord>> {
        let total = self.count_by_owner(owner).await?;

        let files = sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE owner = ?1 ORDER BY id ASC LIMIT ?2 OFFSET ?3",
        )
        .bind(owner)
        .bind(sql_window(page.limit()))
        .bind(sql_window(page.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))?;

        Ok(PageResponse::new(files, page.page, page.page_size, total))
    }

    /// Count an owner's files.
    pub async fn count_by_owner(&self, owner: &str) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE owner = ?1")
            .bind(owner)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))?;
        Ok(count as u64)
    }

    /// List the whole catalog with pagination, oldest first.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<FileRecord>> {
        let total = self.count_all().await?;

        let files = sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files ORDER BY id ASC LIMIT ?1 OFFSET ?2",
        )
        .bind(sql_window(page.limit()))
        .bind(sql_window(page.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))?;

        Ok(PageResponse::new(files, page.page, page.page_size, total))
    }

    /// Count all files in the catalog.
    pub async fn count_all(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))?;
        Ok(count as u64)
    }

    /// Delete a file by ID. Returns whether a row was removed.
    pub async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}

/// SQLite binds LIMIT and OFFSET as i64; clamp instead of wrapping negative.
fn sql_window(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
