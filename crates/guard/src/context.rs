//! The host-supplied context a guard reads holders from.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Key-value view over whatever the host attaches to a request.
///
/// The guard only ever asks for top-level fields by name; nested lookups
/// go through [`FieldPath`](crate::FieldPath) on the returned values.
pub trait Context {
    /// Returns the top-level field `key`, or `None` if it is not present.
    fn field(&self, key: &str) -> Option<&Value>;
}

impl Context for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl Context for Map<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<S: BuildHasher> Context for HashMap<String, Value, S> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<C: Context + ?Sized> Context for &C {
    fn field(&self, key: &str) -> Option<&Value> {
        (**self).field(key)
    }
}

/// JSON type name used in diagnostics.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Like [`json_type`], but calls out arrays whose members are not all strings.
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Array(items) if items.iter().any(|item| !item.is_string()) => {
            "array containing a non-string"
        }
        other => json_type(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_context_reads_object_fields() {
        let ctx = json!({ "user": { "id": 306 } });
        assert_eq!(ctx.field("user"), Some(&json!({ "id": 306 })));
        assert_eq!(ctx.field("session"), None);
    }

    #[test]
    fn non_object_value_has_no_fields() {
        assert_eq!(Value::Null.field("user"), None);
        assert_eq!(json!(["user"]).field("user"), None);
    }

    #[test]
    fn hash_map_context() {
        let mut ctx = HashMap::new();
        ctx.insert("user".to_string(), json!({ "role": ["admin"] }));
        assert!(ctx.field("user").is_some());
        assert!((&ctx).field("user").is_some());
    }

    #[test]
    fn type_names() {
        assert_eq!(json_type(&json!(true)), "boolean");
        assert_eq!(json_type(&json!(1.5)), "number");
        assert_eq!(json_type(&json!({})), "object");
        assert_eq!(describe(&json!(["a"])), "array");
        assert_eq!(describe(&json!(["a", ["b"]])), "array containing a non-string");
    }
}
