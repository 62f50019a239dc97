//! Discovery, loading and saving of locale files
/// Project directory indexer
mod project;
/// Indexer types
mod types;

pub use project::ProjectIndexer;
pub use types::{
    FileFailure,
    IndexerError,
    LoadedFile,
    LoadedProject,
};
