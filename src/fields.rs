//! Note payload normalization
//!
//! Request bodies for notes are loosely shaped: tags arrive either as a list or as a single
//! comma-delimited string, and flags can be any JSON value. Everything is resolved here, once,
//! into canonical types before it reaches the mutation engine.

use serde_json::Map;
use serde_json::Value;

use crate::mutations::Error;

/// Canonical truthiness of a JSON value
///
/// `false`, `null`, `0` and `""` are false, as are non-finite numbers. Everything else,
/// including the string `"false"`, empty arrays and empty objects, is true.
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(value) => *value,
        Value::Number(number) => number
            .as_f64()
            .is_some_and(|number| number.is_finite() && number != 0.0),
        Value::String(value) => !value.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Tag input as received from a client
#[derive(Debug, PartialEq, Eq)]
pub enum TagsInput {
    /// Already a list of strings
    List(Vec<String>),

    /// A single comma-delimited string
    Delimited(String),

    /// Anything else
    Invalid,
}

impl TagsInput {
    /// Classify a raw JSON value
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(tags) => Self::Delimited(tags.clone()),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(ToString::to_string))
                .collect::<Option<Vec<String>>>()
                .map_or(Self::Invalid, Self::List),
            _ => Self::Invalid,
        }
    }

    /// Resolve into the canonical list of tags
    ///
    /// `"a, b , c"` becomes `["a", "b", "c"]`
    pub fn into_tags(self) -> Vec<String> {
        match self {
            Self::List(tags) => tags,
            Self::Delimited(tags) => tags
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(ToString::to_string)
                .collect(),
            Self::Invalid => Vec::new(),
        }
    }
}

/// Note fields present in a request body
///
/// `None` means the field was absent. A present field always carries its normalized value,
/// so "absent" and "present but empty" stay distinguishable.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NoteFields {
    /// Trimmed title
    pub title: Option<String>,

    /// Trimmed content
    pub content: Option<String>,

    /// Normalized tags
    pub tags: Option<Vec<String>>,

    /// Coerced pinned flag
    pub is_pinned: Option<bool>,

    /// Coerced archived flag
    pub is_archived: Option<bool>,

    /// `Some(None)` clears the color
    pub color: Option<Option<String>>,
}

impl NoteFields {
    /// Pick the known note fields out of a JSON object, ignoring unknown keys
    ///
    /// # Errors
    ///
    /// Will return `Err` when `title`, `content` or `color` has the wrong type
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, Error> {
        Ok(Self {
            title: map
                .get("title")
                .map(|value| required_text("Title", value))
                .transpose()?,
            content: map
                .get("content")
                .map(|value| required_text("Content", value))
                .transpose()?,
            tags: map
                .get("tags")
                .map(|value| TagsInput::from_value(value).into_tags()),
            is_pinned: map.get("isPinned").map(coerce_bool),
            is_archived: map.get("isArchived").map(coerce_bool),
            color: map.get("color").map(optional_text).transpose()?,
        })
    }

    /// Does the payload touch nothing at all?
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A required text field: must be a non-empty string after trimming
fn required_text(name: &str, value: &Value) -> Result<String, Error> {
    let Some(text) = value.as_str() else {
        return Err(Error::Validation(format!("{name} must be a string")));
    };

    let text = text.trim();

    if text.is_empty() {
        return Err(Error::Validation(format!("{name} is required")));
    }

    Ok(text.to_string())
}

/// An optional text field, where `null` means "no value"
fn optional_text(value: &Value) -> Result<Option<String>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        _ => Err(Error::Validation("Color must be a string".to_string())),
    }
}
