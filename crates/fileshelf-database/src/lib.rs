//! # fileshelf-database
//!
//! SQLite connection management, catalog schema evolution, and the
//! concrete repository implementation for Fileshelf.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::CatalogPool;
