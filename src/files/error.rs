use thiserror::Error;

/// Errors reading, parsing or writing one locale file
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to access translation file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Translation file must contain a JSON object at the top level")]
    NotAnObject,
    /// Key needs a different nesting than another key of the same file
    #[error("Key '{0}' conflicts with the object or array layout of another key")]
    ShapeConflict(String),
    #[error("Array index {index} of key '{key}' is too large to write")]
    IndexTooLarge { key: String, index: usize },
    /// Another file of the same project already provides this locale
    #[error("Locale '{0}' is already provided by another file")]
    DuplicateLocale(String),
}
