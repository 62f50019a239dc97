use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Largest accepted `output.indent`
const MAX_INDENT: usize = 8;

/// One rejected settings field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field_path}: {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "excludePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid project settings:\n{}", list_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Cannot read project settings: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed project settings: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn list_errors(errors: &[ValidationError]) -> String {
    let lines: Vec<String> =
        errors.iter().enumerate().map(|(n, err)| format!("  {}) {err}", n + 1)).collect();
    lines.join("\n")
}

/// Settings of one translation project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    pub translation_files: TranslationFilesConfig,

    /// Paths (relative to the project root) never treated as locale files
    pub exclude_patterns: Vec<String>,

    pub loading: LoadingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    pub file_pattern: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadingConfig {
    /// Number of locale files read at once.
    /// Default: number of CPU cores.
    pub max_concurrency: Option<usize>,
}

/// Formatting of saved locale files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    /// Spaces per nesting level
    pub indent: usize,
    pub trailing_newline: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { indent: 2, trailing_newline: true }
    }
}

impl EditorSettings {
    /// Checks every field and reports all problems at once.
    ///
    /// # Errors
    /// - Empty or invalid glob pattern
    /// - Indent out of range
    /// - Zero concurrency
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        self.translation_files.check(&mut errors);
        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            check_glob(&format!("excludePatterns[{index}]"), pattern, &mut errors);
        }
        self.loading.check(&mut errors);
        self.output.check(&mut errors);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl TranslationFilesConfig {
    fn check(&self, errors: &mut Vec<ValidationError>) {
        const FIELD: &str = "translationFiles.filePattern";
        if self.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                FIELD,
                "Locale file pattern cannot be empty, e.g. \"locales/*.json\"",
            ));
        } else {
            check_glob(FIELD, &self.file_pattern, errors);
        }
    }
}

impl LoadingConfig {
    /// Concurrency limit with the CPU-count fallback applied.
    #[must_use]
    pub fn concurrency(self) -> usize {
        self.max_concurrency.unwrap_or_else(num_cpus::get).max(1)
    }

    fn check(self, errors: &mut Vec<ValidationError>) {
        if self.max_concurrency == Some(0) {
            errors.push(ValidationError::new(
                "loading.maxConcurrency",
                "At least one file must be read at a time; omit the field to use the CPU count",
            ));
        }
    }
}

impl OutputConfig {
    fn check(self, errors: &mut Vec<ValidationError>) {
        if self.indent > MAX_INDENT {
            errors.push(ValidationError::new(
                "output.indent",
                format!("Indent must be between 0 and {MAX_INDENT}, got {}", self.indent),
            ));
        }
    }
}

fn check_glob(field: &str, pattern: &str, errors: &mut Vec<ValidationError>) {
    if let Err(e) = globset::Glob::new(pattern) {
        errors.push(ValidationError::new(field, format!("'{pattern}' is not a valid glob: {e}")));
    }
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self { file_pattern: "**/*.json".to_string() }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            translation_files: TranslationFilesConfig::default(),
            exclude_patterns: vec!["node_modules/**".to_string()],
            loading: LoadingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn default_settings_are_valid() {
        assert_that!(EditorSettings::default().validate(), ok(anything()));
    }

    #[rstest]
    fn missing_fields_keep_defaults() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{"output": {"indent": 4}}"#).unwrap();

        assert_that!(settings.output.indent, eq(4));
        assert_that!(settings.output.trailing_newline, eq(true));
        assert_that!(settings.exclude_patterns, len(eq(1)));
    }

    #[rstest]
    fn empty_object_uses_defaults() {
        let settings: EditorSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings.translation_files.file_pattern, eq("**/*.json"));
        assert_that!(settings.exclude_patterns, elements_are![eq("node_modules/**")]);
        assert_that!(settings.loading.max_concurrency, none());
        assert_that!(settings.output.indent, eq(2));
    }

    #[rstest]
    fn empty_file_pattern_is_rejected() {
        let settings = EditorSettings {
            translation_files: TranslationFilesConfig { file_pattern: String::new() },
            ..EditorSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationFiles.filePattern")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn malformed_file_pattern_is_rejected() {
        let settings = EditorSettings {
            translation_files: TranslationFilesConfig { file_pattern: "i18n/{en,ja.json".to_string() },
            ..EditorSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationFiles.filePattern")),
                field!(ValidationError.message, contains_substring("not a valid glob"))
            ]])
        );
    }

    #[rstest]
    fn malformed_exclude_pattern_reports_its_index() {
        let settings = EditorSettings {
            exclude_patterns: ["node_modules/**", "build/**", "invalid[pattern"]
                .map(String::from)
                .to_vec(),
            ..EditorSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("excludePatterns[2]")),
                field!(
                    ValidationError.message,
                    contains_substring("'invalid[pattern' is not a valid glob")
                )
            ]])
        );
    }

    #[rstest]
    fn validate_zero_concurrency() {
        let settings = EditorSettings {
            loading: LoadingConfig { max_concurrency: Some(0) },
            ..EditorSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("loading.maxConcurrency"))])
        );
    }

    #[rstest]
    #[case(0, true)]
    #[case(8, true)]
    #[case(9, false)]
    fn validate_indent_range(#[case] indent: usize, #[case] valid: bool) {
        let settings = EditorSettings {
            output: OutputConfig { indent, trailing_newline: false },
            ..EditorSettings::default()
        };

        assert_eq!(settings.validate().is_ok(), valid);
    }

    #[rstest]
    fn concurrency_falls_back_to_cpu_count() {
        assert_that!(LoadingConfig::default().concurrency(), ge(1));
        assert_that!(LoadingConfig { max_concurrency: Some(3) }.concurrency(), eq(3));
    }

    #[rstest]
    fn validation_errors_are_listed_in_field_order() {
        let settings = EditorSettings {
            translation_files: TranslationFilesConfig { file_pattern: String::new() },
            output: OutputConfig { indent: 12, trailing_newline: true },
            ..EditorSettings::default()
        };

        let message = ConfigError::ValidationErrors(settings.validate().unwrap_err()).to_string();

        assert_that!(message, starts_with("Invalid project settings:"));
        assert_that!(message, contains_substring("1) translationFiles.filePattern: "));
        assert_that!(
            message,
            contains_substring("2) output.indent: Indent must be between 0 and 8, got 12")
        );
    }
}
