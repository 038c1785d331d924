//! File domain entities and filename analysis.

pub mod key;
pub mod model;
pub mod name;

pub use key::CanonicalKey;
pub use model::{FileRecord, NewFileRecord};
pub use name::FileName;
