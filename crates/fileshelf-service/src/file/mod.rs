//! File catalog services — naming policy and upload/list/delete flows.

pub mod naming;
pub mod service;

pub use service::{FileService, UploadRequest, UploadedFile};
