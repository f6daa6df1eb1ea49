//! Pulling a holder's permissions out of a context.

use crate::context::describe;
use crate::{Context, Fault, FieldPath};
use serde_json::Value;

/// Ordered permissions granted to a holder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(Vec<String>);

impl PermissionSet {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(permissions.into_iter().map(Into::into).collect())
    }

    /// Split a space-delimited encoding such as an OAuth `scope` claim.
    pub fn from_delimited(encoded: &str) -> Self {
        Self::new(encoded.split_whitespace())
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.iter().any(|p| p == permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(permissions: Vec<String>) -> Self {
        Self(permissions)
    }
}

/// Resolve `holder` on the context, then `permissions` on the holder.
///
/// The permission field may be an array of strings or one space-delimited
/// string; anything else is a [`Fault::WrongType`].
pub fn extract<C: Context + ?Sized>(
    context: &C,
    holder: &FieldPath,
    permissions: &FieldPath,
) -> Result<PermissionSet, Fault> {
    let holder_value = holder
        .resolve_in(context)
        .ok_or_else(|| Fault::MissingHolder {
            field: holder.to_string(),
        })?;

    let value = permissions
        .resolve(holder_value)
        .ok_or_else(|| Fault::MissingPermissionField {
            field: permissions.to_string(),
        })?;

    normalize(value).ok_or_else(|| Fault::WrongType {
        field: permissions.to_string(),
        found: describe(value),
    })
}

fn normalize(value: &Value) -> Option<PermissionSet> {
    match value {
        Value::String(encoded) => Some(PermissionSet::from_delimited(encoded)),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(PermissionSet),
        _ => None,
    }
}
