//! Dotted translation key helpers.
//!
//! A translation key is a sequence of one or more non-empty, whitespace-free
//! segments joined by [`SEPARATOR`] (e.g. `common.buttons.submit`). Keys form a
//! hierarchy through the prefix relation: `a.b.c` is a descendant of `a.b` and
//! of `a`. Every function here is pure and compares keys case-sensitively.

use std::collections::HashSet;

use thiserror::Error;

/// Separator between key segments.
pub const SEPARATOR: char = '.';

/// Reasons a key string is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Translation key cannot be empty")]
    Empty,
    #[error("Translation key '{0}' cannot start with '.'")]
    LeadingSeparator(String),
    #[error("Translation key '{0}' cannot end with '.'")]
    TrailingSeparator(String),
    #[error("Translation key '{0}' contains an empty segment")]
    EmptySegment(String),
    #[error("Translation key '{0}' contains whitespace")]
    Whitespace(String),
}

/// Checks the key syntax and returns the first violation found.
///
/// # Examples
/// ```
/// use i18n_keytree::key::{validate, KeyError};
///
/// assert!(validate("common.hello").is_ok());
/// assert_eq!(validate(".hello"), Err(KeyError::LeadingSeparator(".hello".to_string())));
/// ```
pub fn validate(key: &str) -> Result<(), KeyError> {
    if key.is_empty() {
        return Err(KeyError::Empty);
    }
    if key.starts_with(SEPARATOR) {
        return Err(KeyError::LeadingSeparator(key.to_string()));
    }
    if key.ends_with(SEPARATOR) {
        return Err(KeyError::TrailingSeparator(key.to_string()));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(KeyError::Whitespace(key.to_string()));
    }
    if key.split(SEPARATOR).any(str::is_empty) {
        return Err(KeyError::EmptySegment(key.to_string()));
    }
    Ok(())
}

#[must_use]
pub fn is_valid(key: &str) -> bool {
    validate(key).is_ok()
}

/// Splits a key into its segments. Empty segments are dropped.
#[must_use]
pub fn segments(key: &str) -> Vec<&str> {
    key.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// Joins segments with the separator, skipping empty ones.
#[must_use]
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Joins a prefix and a suffix, either of which may be empty.
#[must_use]
pub fn create(prefix: &str, suffix: &str) -> String {
    join(&[prefix, suffix])
}

/// Returns `true` if `descendant` lies strictly below `ancestor`.
#[must_use]
pub fn is_ancestor_of(ancestor: &str, descendant: &str) -> bool {
    descendant.len() > ancestor.len()
        && descendant.starts_with(ancestor)
        && descendant[ancestor.len()..].starts_with(SEPARATOR)
}

/// Remainder of `key` after stripping `ancestor.`.
///
/// Returns an empty string when `key == ancestor` and `key` itself when it is
/// not below `ancestor`.
#[must_use]
pub fn child_suffix<'a>(key: &'a str, ancestor: &str) -> &'a str {
    if key == ancestor {
        return "";
    }
    if is_ancestor_of(ancestor, key) {
        return &key[ancestor.len() + SEPARATOR.len_utf8()..];
    }
    key
}

/// Parent key, or `None` for a single-segment key.
#[must_use]
pub fn parent(key: &str) -> Option<&str> {
    key.rfind(SEPARATOR).map(|index| &key[..index])
}

#[must_use]
pub fn last_segment(key: &str) -> &str {
    key.rfind(SEPARATOR).map_or(key, |index| &key[index + SEPARATOR.len_utf8()..])
}

/// All strict prefixes of `key`, shortest first (`a.b.c` -> `a`, `a.b`).
#[must_use]
pub fn ancestors(key: &str) -> Vec<&str> {
    key.match_indices(SEPARATOR).map(|(index, _)| &key[..index]).collect()
}

/// Distinct first segments in order of first appearance.
#[must_use]
pub fn unique_first_segments<S: AsRef<str>>(keys: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.iter()
        .filter_map(|key| segments(key.as_ref()).first().map(|s| (*s).to_string()))
        .filter(|segment| seen.insert(segment.clone()))
        .collect()
}

/// Suffixes of every key lying strictly below `ancestor`.
#[must_use]
pub fn extract_child_keys<S: AsRef<str>>(keys: &[S], ancestor: &str) -> Vec<String> {
    keys.iter()
        .map(AsRef::as_ref)
        .filter(|key| is_ancestor_of(ancestor, key))
        .map(|key| child_suffix(key, ancestor).to_string())
        .collect()
}
