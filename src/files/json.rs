//! Conversion between nested JSON objects and flat dotted keys.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{
    Serializer,
    Value,
};

use crate::config::OutputConfig;
use crate::files::error::FileError;
use crate::key;

/// Flatten nested JSON object into dotted key/value pairs.
///
/// Nested objects become dotted keys, array elements `key[index]`, and
/// numbers and booleans their JSON text. `null` values are skipped.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use i18n_keytree::files::flatten_json;
///
/// let json = json!({
///     "common": {
///         "hello": "Hello",
///         "goodbye": "Goodbye"
///     }
/// });
///
/// let flattened = flatten_json(&json);
/// assert_eq!(
///     flattened,
///     vec![
///         ("common.goodbye".to_string(), "Goodbye".to_string()),
///         ("common.hello".to_string(), "Hello".to_string()),
///     ]
/// );
/// ```
#[must_use]
pub fn flatten_json(json: &Value) -> Vec<(String, String)> {
    let mut result = Vec::new();
    flatten_json_value(json, None, &mut result);
    result
}

fn flatten_json_value(json: &Value, prefix: Option<&str>, result: &mut Vec<(String, String)>) {
    match json {
        Value::Object(map) => {
            for (name, value) in map {
                let full_key = prefix.map_or_else(|| name.clone(), |p| key::create(p, name));
                flatten_json_value(value, Some(&full_key), result);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_json_value(value, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(k) = prefix {
                result.push((k.to_string(), s.clone()));
            }
        }
        // Holes of written arrays; never a translation
        Value::Null => {}
        _ => {
            if let Some(k) = prefix {
                result.push((k.to_string(), json.to_string()));
            }
        }
    }
}

/// Parses the text of a locale file into flat pairs.
///
/// # Errors
/// Returns error if the text is not JSON or not an object.
pub fn parse_translations(text: &str) -> Result<Vec<(String, String)>, FileError> {
    let json: Value = serde_json::from_str(text)?;
    if !json.is_object() {
        return Err(FileError::NotAnObject);
    }
    Ok(flatten_json(&json))
}

/// Largest array index a key may address when written back.
///
/// Missing elements below it are written as `null`, which loading skips.
pub const MAX_ARRAY_INDEX: usize = 9_999;

enum Step<'a> {
    Field(&'a str),
    Index(usize),
}

/// Nested value under construction.
enum Slot<'a> {
    Vacant,
    Text(&'a str),
    Object(BTreeMap<&'a str, Slot<'a>>),
    /// Elements by index; gaps stay unallocated until rendering
    Array(BTreeMap<usize, Slot<'a>>),
}

/// Rebuilds the nested object for flat pairs.
///
/// Segments ending in `[index]` become array elements again, so the output
/// of [`flatten_json`] is restored for string values.
///
/// # Errors
/// - Two keys need different shapes at the same place, such as `list.title`
///   with `list[0]`, or `a` with `a[0]`
/// - An index above [`MAX_ARRAY_INDEX`]
pub fn unflatten_json<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<Value, FileError> {
    let mut root = Slot::Object(BTreeMap::new());
    for (k, value) in entries {
        insert_at(&mut root, &path_steps(k), k, value)?;
    }
    Ok(root.into_value())
}

fn path_steps(k: &str) -> Vec<Step<'_>> {
    let mut steps = Vec::new();
    for segment in key::segments(k) {
        let (name, indices) = split_indices(segment);
        if !name.is_empty() {
            steps.push(Step::Field(name));
        }
        steps.extend(indices.into_iter().map(Step::Index));
    }
    steps
}

/// `items[0][1]` → `("items", [0, 1])`
///
/// Only canonical decimal indices count; `items[01]` stays a plain name.
fn split_indices(segment: &str) -> (&str, Vec<usize>) {
    let mut indices = Vec::new();
    let mut rest = segment;
    while let Some(stripped) = rest.strip_suffix(']')
        && let Some(open) = stripped.rfind('[')
        && let Some(index) = stripped.get(open + 1..).and_then(parse_index)
        && let Some(name) = stripped.get(..open)
    {
        indices.push(index);
        rest = name;
    }
    indices.reverse();
    (rest, indices)
}

fn parse_index(digits: &str) -> Option<usize> {
    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    if canonical { digits.parse().ok() } else { None }
}

fn insert_at<'a>(
    slot: &mut Slot<'a>,
    steps: &[Step<'a>],
    k: &str,
    value: &'a str,
) -> Result<(), FileError> {
    let shape_error = || FileError::ShapeConflict(k.to_string());

    let Some((step, rest)) = steps.split_first() else {
        return match slot {
            Slot::Vacant => {
                *slot = Slot::Text(value);
                Ok(())
            }
            _ => Err(shape_error()),
        };
    };

    let child = match step {
        Step::Field(name) => {
            if matches!(slot, Slot::Vacant) {
                *slot = Slot::Object(BTreeMap::new());
            }
            let Slot::Object(fields) = slot else {
                return Err(shape_error());
            };
            fields.entry(*name).or_insert(Slot::Vacant)
        }
        Step::Index(index) => {
            if *index > MAX_ARRAY_INDEX {
                return Err(FileError::IndexTooLarge { key: k.to_string(), index: *index });
            }
            if matches!(slot, Slot::Vacant) {
                *slot = Slot::Array(BTreeMap::new());
            }
            let Slot::Array(items) = slot else {
                return Err(shape_error());
            };
            items.entry(*index).or_insert(Slot::Vacant)
        }
    };
    insert_at(child, rest, k, value)
}

impl Slot<'_> {
    fn into_value(self) -> Value {
        match self {
            Self::Vacant => Value::Null,
            Self::Text(text) => Value::String(text.to_string()),
            Self::Object(fields) => Value::Object(
                fields.into_iter().map(|(name, slot)| (name.to_string(), slot.into_value())).collect(),
            ),
            Self::Array(mut items) => {
                let len = items.last_key_value().map_or(0, |(index, _)| index + 1);
                Value::Array(
                    (0..len)
                        .map(|index| items.remove(&index).map_or(Value::Null, Slot::into_value))
                        .collect(),
                )
            }
        }
    }
}

/// Renders flat pairs as the text of a locale file.
///
/// # Errors
/// Returns error if the pairs have no nested form (see [`unflatten_json`])
/// or serialization fails.
pub fn render_translations<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    output: &OutputConfig,
) -> Result<String, FileError> {
    let value = unflatten_json(entries)?;
    let indent = " ".repeat(output.indent);
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut serializer)?;

    let mut text = String::from_utf8(buffer).map_err(std::io::Error::other)?;
    if output.trailing_newline {
        text.push('\n');
    }
    Ok(text)
}
