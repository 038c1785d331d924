//! File catalog entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::file::key::CanonicalKey;

/// A file stored in the Fileshelf catalog.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique record identifier.
    pub id: i64,
    /// Free-form description supplied by the uploader.
    pub description: String,
    /// The stored file name, disambiguated within the owner's catalog.
    pub filename: String,
    /// MIME type declared by the uploader.
    pub mimetype: String,
    /// Opaque content surrogate (e.g. base64-encoded data).
    pub payload: String,
    /// The identity this file belongs to.
    pub owner: String,
    /// Digest of the filename with any duplicate marker stripped.
    pub canonical_key: CanonicalKey,
    /// Duplicate ordinal within the canonical family; 0 is the original.
    pub version: i64,
}

/// Data required to insert a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFileRecord {
    /// Free-form description supplied by the uploader.
    pub description: String,
    /// The final stored file name.
    pub filename: String,
    /// MIME type declared by the uploader.
    pub mimetype: String,
    /// Opaque content surrogate.
    pub payload: String,
    /// The identity this file belongs to.
    pub owner: String,
    /// Digest of the filename with any duplicate marker stripped.
    pub canonical_key: CanonicalKey,
    /// Duplicate ordinal within the canonical family.
    pub version: i64,
}
