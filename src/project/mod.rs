//! Coordinator keeping every locale resource and the key tree in step
/// Structural edits across resources
mod coordinator;
/// Error types
mod error;

pub use coordinator::Project;
pub use error::ProjectError;
