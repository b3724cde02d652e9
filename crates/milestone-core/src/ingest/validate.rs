//! Completeness check for content blocks.
//!
//! A block is complete when no list or object anywhere in it is empty, no
//! value is null, and no string is blank. Blank strings are tolerated
//! under a `notes` key (directly, or as items of a `notes` list).

use serde_json::Value;
use thiserror::Error;

/// Key whose strings may be blank.
pub const FREE_TEXT_KEY: &str = "notes";

/// First offending node, with a `$.a.b[0]` style path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("top-level value is not an object")]
    NotAnObject,

    #[error("empty list at {0}")]
    EmptyList(String),

    #[error("empty object at {0}")]
    EmptyObject(String),

    #[error("blank string at {0}")]
    BlankString(String),

    #[error("null at {0}")]
    Null(String),
}

impl ValidationError {
    /// Path of the offending node, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::NotAnObject => None,
            Self::EmptyList(p) | Self::EmptyObject(p) | Self::BlankString(p) | Self::Null(p) => {
                Some(p.as_str())
            }
        }
    }
}

/// Validate a parsed response.
pub fn check_complete(value: &Value) -> Result<(), ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::NotAnObject);
    }
    walk(value, "$", false)
}

/// `true` when [`check_complete`] passes.
pub fn is_complete(value: &Value) -> bool {
    check_complete(value).is_ok()
}

fn walk(value: &Value, path: &str, free_text: bool) -> Result<(), ValidationError> {
    match value {
        Value::Null => Err(ValidationError::Null(path.to_string())),
        Value::String(s) if s.trim().is_empty() && !free_text => {
            Err(ValidationError::BlankString(path.to_string()))
        }
        Value::Array(items) => {
            if items.is_empty() {
                return Err(ValidationError::EmptyList(path.to_string()));
            }
            items
                .iter()
                .enumerate()
                .try_for_each(|(i, item)| walk(item, &format!("{path}[{i}]"), free_text))
        }
        Value::Object(map) => {
            if map.is_empty() {
                return Err(ValidationError::EmptyObject(path.to_string()));
            }
            map.iter().try_for_each(|(key, child)| {
                walk(child, &format!("{path}.{key}"), key == FREE_TEXT_KEY)
            })
        }
        _ => Ok(()),
    }
}
