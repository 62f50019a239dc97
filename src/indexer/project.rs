//! Project directory indexer
use std::collections::HashSet;
use std::path::{
    Path,
    PathBuf,
};

use futures::stream::{
    self,
    StreamExt,
};
use ignore::WalkBuilder;

use crate::config::{
    CONFIG_FILE_NAME,
    ConfigError,
    EditorSettings,
    FileMatcher,
};
use crate::files::{
    self,
    FileError,
};
use crate::indexer::types::{
    FileFailure,
    IndexerError,
    LoadedFile,
    LoadedProject,
};
use crate::project::Project;
use crate::resource::Resource;

/// Finds, loads and saves the locale files of one project directory.
#[derive(Debug, Clone)]
pub struct ProjectIndexer {
    matcher: FileMatcher,
    settings: EditorSettings,
}

impl ProjectIndexer {
    /// # Errors
    /// - Settings fail validation
    /// - A glob pattern cannot be compiled
    pub fn new(
        project_root: impl Into<PathBuf>,
        settings: EditorSettings,
    ) -> Result<Self, IndexerError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        let matcher = FileMatcher::new(project_root.into(), &settings)?;
        Ok(Self { matcher, settings })
    }

    #[must_use]
    pub fn project_root(&self) -> &Path {
        self.matcher.project_root()
    }

    #[must_use]
    pub const fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Locale files under the project root, in path order.
    #[must_use]
    pub fn find_translation_files(&self) -> Vec<PathBuf> {
        let project_root = self.project_root();
        let mut found_files = Vec::new();

        for result in WalkBuilder::new(project_root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            if path.file_name().is_some_and(|name| name == CONFIG_FILE_NAME) {
                continue;
            }
            if !self.matcher.is_translation_file(path) {
                continue;
            }

            found_files.push(path.to_path_buf());
        }

        found_files.sort();
        found_files
    }

    /// Reads and parses `paths` concurrently.
    ///
    /// At most `loading.maxConcurrency` files are read at once. Both results
    /// are sorted by path.
    pub async fn read_files(&self, paths: Vec<PathBuf>) -> (Vec<LoadedFile>, Vec<FileFailure>) {
        let results: Vec<Result<LoadedFile, FileFailure>> = stream::iter(paths)
            .map(|path| self.read_file(path))
            .buffer_unordered(self.settings.loading.concurrency())
            .collect()
            .await;

        let mut loaded = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(file) => loaded.push(file),
                Err(failure) => failures.push(failure),
            }
        }
        loaded.sort_by(|a, b| a.path.cmp(&b.path));
        failures.sort_by(|a, b| a.path.cmp(&b.path));
        (loaded, failures)
    }

    async fn read_file(&self, path: PathBuf) -> Result<LoadedFile, FileFailure> {
        let locale = self.locale_for(&path);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) => return Err(FileFailure::new(path, e)),
        };
        match files::parse_translations(&text) {
            Ok(entries) => Ok(LoadedFile { locale, path, entries }),
            Err(e) => Err(FileFailure::new(path, e)),
        }
    }

    /// Locale code found in the path relative to the project root, or the
    /// file stem.
    fn locale_for(&self, path: &Path) -> String {
        let relative_path = path.strip_prefix(self.project_root()).unwrap_or(path);
        files::detect_locale_from_path(relative_path).unwrap_or_else(|| {
            path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
        })
    }

    /// Loads every locale file into a new project.
    ///
    /// Unreadable files and files whose locale was already loaded are
    /// reported in [`LoadedProject::failures`] and skipped.
    pub async fn load(&self) -> Result<LoadedProject, IndexerError> {
        tracing::debug!(project_root = %self.project_root().display(), "Loading project");
        let paths = self.find_translation_files();
        let (loaded, mut failures) = self.read_files(paths).await;

        let mut seen = HashSet::new();
        let mut resources = Vec::new();
        for file in loaded {
            if !seen.insert(file.locale.clone()) {
                failures.push(FileFailure::new(file.path, FileError::DuplicateLocale(file.locale)));
                continue;
            }
            resources.push(Resource::from_entries(file.locale, file.entries).with_path(file.path));
        }

        for failure in &failures {
            tracing::warn!(
                path = %failure.path.display(),
                error = %failure.error,
                "Skipping translation file"
            );
        }

        let project = Project::from_resources(resources)?;
        tracing::debug!(
            locales = project.locales().count(),
            failures = failures.len(),
            "Project loaded"
        );
        Ok(LoadedProject { project, failures })
    }

    /// Writes every dirty resource back to its file.
    ///
    /// A resource without a backing file is written to `<locale>.json` in
    /// the project root. Saved resources are marked clean; failed ones stay
    /// dirty and are returned.
    pub async fn save(&self, project: &mut Project) -> Vec<FileFailure> {
        let mut failures = Vec::new();
        let mut pending = Vec::new();
        for resource in project.resources().filter(|r| r.is_dirty()) {
            let path = resource.path().map_or_else(
                || self.project_root().join(format!("{}.json", resource.locale())),
                Path::to_path_buf,
            );
            match files::render_translations(resource.entries(), &self.settings.output) {
                Ok(text) => pending.push((resource.locale().to_string(), path, text)),
                Err(e) => failures.push(FileFailure::new(path, e)),
            }
        }

        let results: Vec<_> = stream::iter(pending)
            .map(|(locale, path, text)| async move {
                let result = write_file(&path, &text).await;
                (locale, path, result)
            })
            .buffer_unordered(self.settings.loading.concurrency())
            .collect()
            .await;

        for (locale, path, result) in results {
            match result {
                Ok(()) => {
                    if let Some(resource) = project.resources_mut().find(|r| r.locale() == locale) {
                        resource.set_path(&path);
                        resource.mark_saved();
                    }
                    tracing::debug!(locale = %locale, path = %path.display(), "Saved translation file");
                }
                Err(e) => {
                    tracing::warn!(
                        locale = %locale,
                        path = %path.display(),
                        error = %e,
                        "Failed to save translation file"
                    );
                    failures.push(FileFailure::new(path, e));
                }
            }
        }

        failures.sort_by(|a, b| a.path.cmp(&b.path));
        failures
    }
}

async fn write_file(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, text).await
}
