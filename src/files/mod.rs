//! JSON locale files
/// Error types
mod error;
/// Flattening between nested JSON and dotted keys
mod json;
/// Locale detection from file paths
mod locale;

pub use error::FileError;
pub use json::{
    MAX_ARRAY_INDEX,
    flatten_json,
    parse_translations,
    render_translations,
    unflatten_json,
};
pub use locale::{
    detect_locale_from_path,
    is_locale_code,
};
