//! Glob matching of locale file paths.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::EditorSettings;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Locale file pattern '{pattern}' does not compile: {source}")]
    InvalidTranslationPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Exclude pattern '{pattern}' does not compile: {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Cannot combine glob patterns: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Decides which files below a project root are locale files.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    project_root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
}

impl FileMatcher {
    pub fn new(project_root: PathBuf, settings: &EditorSettings) -> Result<Self, MatcherError> {
        let include = compile([&settings.translation_files.file_pattern], |pattern, source| {
            MatcherError::InvalidTranslationPattern { pattern, source }
        })?;
        let exclude = compile(&settings.exclude_patterns, |pattern, source| {
            MatcherError::InvalidExcludePattern { pattern, source }
        })?;

        Ok(Self { project_root, include, exclude })
    }

    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Whether an absolute path below the project root is a locale file.
    #[must_use]
    pub fn is_translation_file(&self, absolute_path: &Path) -> bool {
        absolute_path
            .strip_prefix(&self.project_root)
            .is_ok_and(|relative| self.is_translation_file_relative(relative))
    }

    /// Included by `translationFiles.filePattern` and not by any of
    /// `excludePatterns`.
    #[must_use]
    pub fn is_translation_file_relative(&self, relative_path: &Path) -> bool {
        self.include.is_match(relative_path) && !self.exclude.is_match(relative_path)
    }
}

fn compile<'a>(
    patterns: impl IntoIterator<Item = &'a String>,
    invalid: fn(String, globset::Error) -> MatcherError,
) -> Result<GlobSet, MatcherError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).map_err(|source| invalid(pattern.clone(), source))?);
    }
    Ok(builder.build()?)
}
