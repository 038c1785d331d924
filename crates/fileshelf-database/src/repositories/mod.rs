//! Repository implementations for the Fileshelf catalog.

pub mod file;

pub use file::FileRepository;
