//! Core type definitions used across the Fileshelf workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
