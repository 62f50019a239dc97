//! Indexer type definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{
    ConfigError,
    MatcherError,
};
use crate::files::FileError;
use crate::project::{
    Project,
    ProjectError,
};

#[derive(Error, Debug)]
pub enum IndexerError {
    /// Error when a configured glob pattern cannot be compiled
    #[error(transparent)]
    InvalidPattern(#[from] MatcherError),
    /// Error when the settings do not pass validation
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Error when the loaded resources cannot form a project
    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// A locale file that could not be loaded or saved.
///
/// Failures are collected per file; the rest of the project is unaffected.
#[derive(Error, Debug)]
#[error("{}: {error}", .path.display())]
pub struct FileFailure {
    pub path: PathBuf,
    #[source]
    pub error: FileError,
}

impl FileFailure {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, error: impl Into<FileError>) -> Self {
        Self { path: path.into(), error: error.into() }
    }
}

/// Parsed content of one locale file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub locale: String,
    pub path: PathBuf,
    /// Flattened pairs in file order
    pub entries: Vec<(String, String)>,
}

/// Result of loading a project directory.
#[derive(Debug)]
pub struct LoadedProject {
    pub project: Project,
    /// Files skipped while loading
    pub failures: Vec<FileFailure>,
}
