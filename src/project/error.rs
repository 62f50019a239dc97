use thiserror::Error;

use crate::key::KeyError;

/// Errors returned by [`Project`](super::Project) operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    /// Key syntax was rejected before any resource was touched
    #[error(transparent)]
    InvalidKey(#[from] KeyError),
    /// The source key of a rename or duplicate has no tree node
    #[error("Unknown translation key: {0}")]
    UnknownKey(String),
    #[error("No resource loaded for locale: {0}")]
    UnknownLocale(String),
    #[error("A resource for locale '{0}' is already loaded")]
    DuplicateLocale(String),
}
