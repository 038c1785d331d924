//! # fileshelf-service
//!
//! Business logic service layer for Fileshelf. The file service
//! orchestrates the filename analyzer, the version-assignment policy,
//! and the catalog repository to implement collision-free uploads.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod file;

pub use file::{FileService, UploadRequest, UploadedFile};
