//! Catalog schema evolution.
//!
//! [`ensure_schema`] runs once at process start, never per request. It
//! creates the `files` table when absent, additively adds the
//! canonical-key columns to catalogs that predate hash indexing,
//! backfills those columns from the stored filenames, and builds the
//! indexes the version queries rely on. Every step is idempotent, so
//! rerunning it against an up-to-date catalog is a no-op.

use std::collections::HashSet;

use sqlx::SqlitePool;
use tracing::{debug, info};

use fileshelf_core::error::{AppError, ErrorKind};
use fileshelf_core::result::AppResult;
use fileshelf_entity::file::{CanonicalKey, FileName};

/// DDL for a fresh catalog. Carries the full current column set, so new
/// deployments never take the legacy upgrade path.
const CREATE_FILES_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    filename TEXT NOT NULL,
    mimetype TEXT NOT NULL,
    payload TEXT NOT NULL,
    owner TEXT NOT NULL,
    canonical_key TEXT,
    version INTEGER
)";

/// Bring the catalog schema up to date.
///
/// Failure here is fatal for the embedding process: serving uploads
/// against a half-evolved catalog would hand out colliding filenames.
pub async fn ensure_schema(pool: &SqlitePool) -> AppResult<()> {
    info!("Ensuring catalog schema");

    sqlx::query(CREATE_FILES_TABLE)
        .execute(pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create files table", e)
        })?;

    add_missing_columns(pool).await?;
    backfill_canonical_keys(pool).await?;
    create_indexes(pool).await?;

    info!("Catalog schema is up to date");
    Ok(())
}

/// Column names of the live `files` table, empty when the table is absent.
async fn table_columns(pool: &SqlitePool) -> AppResult<HashSet<String>> {
    let columns: Vec<(i32, String, String, i32, Option<String>, i32)> =
        sqlx::query_as("PRAGMA table_info(files)")
            .fetch_all(pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to inspect files table", e)
            })?;

    Ok(columns.into_iter().map(|(_, name, ..)| name).collect())
}

/// Additively add columns introduced after the original catalog layout.
///
/// SQLite has no `ADD COLUMN IF NOT EXISTS`, so the live column set is
/// inspected first. Columns are never dropped or renamed.
async fn add_missing_columns(pool: &SqlitePool) -> AppResult<()> {
    let names = table_columns(pool).await?;

    for (column, ddl) in [
        ("canonical_key", "ALTER TABLE files ADD COLUMN canonical_key TEXT"),
        ("version", "ALTER TABLE files ADD COLUMN version INTEGER"),
    ] {
        if !names.contains(column) {
            debug!(column, "Adding missing catalog column");
            sqlx::query(ddl).execute(pool).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to add column '{column}'"),
                    e,
                )
            })?;
        }
    }

    Ok(())
}

/// Derive `canonical_key` and `version` for rows that predate them.
///
/// The stored filename is the source of truth: an embedded duplicate
/// marker becomes the version and the key hashes the unmarked name. The
/// `IS NULL` guard keeps reruns from touching rows that already carry
/// values.
async fn backfill_canonical_keys(pool: &SqlitePool) -> AppResult<()> {
    let rows: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, filename FROM files WHERE canonical_key IS NULL")
            .fetch_all(pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load unindexed rows", e)
            })?;

    if rows.is_empty() {
        return Ok(());
    }

    info!(rows = rows.len(), "Backfilling canonical keys");

    for (id, filename) in rows {
        let name = FileName::parse(&filename);
        let key = CanonicalKey::of(&name);
        let version = name.marker.unwrap_or(0);

        sqlx::query(
            "UPDATE files SET canonical_key = ?1, version = ?2 \
             WHERE id = ?3 AND canonical_key IS NULL",
        )
        .bind(&key)
        .bind(version)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to backfill row {id}"),
                e,
            )
        })?;
    }

    Ok(())
}

/// Create lookup indexes, including the uniqueness guard that makes
/// concurrent version assignment safe.
async fn create_indexes(pool: &SqlitePool) -> AppResult<()> {
    for ddl in [
        "CREATE INDEX IF NOT EXISTS idx_files_owner ON files(owner)",
        "CREATE INDEX IF NOT EXISTS idx_files_canonical_key ON files(canonical_key)",
    ] {
        sqlx::query(ddl).execute(pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create catalog index", e)
        })?;
    }

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS ux_files_owner_key_version \
         ON files(owner, canonical_key, version)",
    )
    .execute(pool)
    .await
    .map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            "Failed to create unique version index; the catalog holds rows that \
             resolve to the same owner, canonical key, and version",
            e,
        )
    })?;

    Ok(())
}

/// Presence of each schema piece [`ensure_schema`] manages.
#[derive(Debug, Clone, Copy)]
pub struct SchemaStatus {
    pub files_table: bool,
    pub canonical_key_column: bool,
    pub version_column: bool,
    pub version_index: bool,
}

impl SchemaStatus {
    /// True when the catalog needs no evolution.
    pub fn is_current(&self) -> bool {
        self.files_table && self.canonical_key_column && self.version_column && self.version_index
    }
}

/// Inspect the catalog schema without changing it.
pub async fn schema_status(pool: &SqlitePool) -> AppResult<SchemaStatus> {
    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'files'",
    )
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to inspect catalog schema", e))?;

    if tables == 0 {
        return Ok(SchemaStatus {
            files_table: false,
            canonical_key_column: false,
            version_column: false,
            version_index: false,
        });
    }

    let columns = table_columns(pool).await?;

    let indexes: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master \
         WHERE type = 'index' AND name = 'ux_files_owner_key_version'",
    )
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to inspect catalog indexes", e))?;

    Ok(SchemaStatus {
        files_table: true,
        canonical_key_column: columns.contains("canonical_key"),
        version_column: columns.contains("version"),
        version_index: indexes > 0,
    })
}
