//! Dotted field paths such as `user` or `profile.roles`.

use crate::Context;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A field path could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field path '{path}': {reason}")]
pub struct InvalidFieldPath {
    pub path: String,
    pub reason: &'static str,
}

/// A validated, dot-separated path into a JSON-like structure.
///
/// Segments that parse as integers also index into arrays, so
/// `accounts.0.role` reaches the first account's `role` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path.
    pub fn parse(raw: &str) -> Result<Self, InvalidFieldPath> {
        let invalid = |reason| InvalidFieldPath {
            path: raw.to_string(),
            reason,
        };

        if raw.trim().is_empty() {
            return Err(invalid("path is empty"));
        }

        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(invalid("path contains an empty segment"));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Resolve this path starting at a context. `null` counts as absent.
    pub fn resolve_in<'a, C: Context + ?Sized>(&self, context: &'a C) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let root = context.field(first)?;
        descend(root, rest)
    }

    /// Resolve this path starting at a value. `null` counts as absent.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        descend(root, &self.segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for FieldPath {
    type Err = InvalidFieldPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn descend<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    (!current.is_null()).then_some(current)
}
