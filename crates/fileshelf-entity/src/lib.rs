//! # fileshelf-entity
//!
//! Domain entity models for Fileshelf. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! `sqlx::FromRow`.

pub mod file;
