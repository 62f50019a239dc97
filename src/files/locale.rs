//! Locale detection from file paths.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// ISO 639-1 primary language subtags accepted as the start of a locale code
static LANGUAGE_SUBTAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "af", "ar", "az", "be", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el", "en", "eo",
        "es", "et", "eu", "fa", "fi", "fil", "fo", "fr", "ga", "gl", "gu", "he", "hi", "hr", "hu",
        "hy", "id", "is", "it", "ja", "ka", "kk", "km", "kn", "ko", "ky", "lo", "lt", "lv", "mi",
        "mk", "ml", "mn", "mr", "ms", "mt", "my", "nb", "ne", "nl", "nn", "no", "pa", "pl", "ps",
        "pt", "qu", "ro", "ru", "si", "sk", "sl", "sq", "sr", "sv", "sw", "ta", "te", "th", "tl",
        "tr", "tt", "uk", "ur", "uz", "vi", "xh", "yo", "zh", "zu",
    ]
    .into_iter()
    .collect()
});

/// Checks whether `part` looks like a locale code such as `en`, `ja-JP`,
/// `pt_BR` or `sr-Cyrl-BA`.
#[must_use]
pub fn is_locale_code(part: &str) -> bool {
    let mut subtags = part.split(['-', '_']);
    let Some(language) = subtags.next() else {
        return false;
    };
    LANGUAGE_SUBTAGS.contains(language.to_lowercase().as_str())
        && subtags.all(|subtag| {
            (2..=4).contains(&subtag.len()) && subtag.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

/// Detect locale from file path heuristically
///
/// Splits the path by separators and '.', then searches backwards for a part
/// that looks like a locale code.
///
/// # Examples
/// - `locales/en.json` → `en`
/// - `messages/ja-JP.json` → `ja-JP`
/// - `translations/en_US/common.json` → `en_US`
#[must_use]
pub fn detect_locale_from_path(file_path: &Path) -> Option<String> {
    let path_str = file_path.to_string_lossy();
    path_str
        .split(['/', '\\', '.'])
        .rev()
        .find(|part| is_locale_code(part))
        .map(str::to_string)
}
