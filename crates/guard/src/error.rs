//! Request-time error types.
//!
//! A check that does not pass is either a [`Fault`] (the caller or the
//! configuration is wrong) or a [`Denial`] (everything is well-formed but the
//! holder lacks the permission). [`Rejection`] carries one of the two so a
//! host can map them to different responses.

use crate::{PermissionKind, RequirementList};
use thiserror::Error;

/// A caller or configuration mistake discovered while evaluating.
///
/// Faults say nothing about whether the holder actually has a permission.
/// Hosts conventionally surface them as server errors and never retry.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Fault {
    /// A requirement entry is neither a string nor a list of strings.
    #[error(
        "requirement #{index} expected to be a string or an array of strings but got: {found}"
    )]
    BadRequirementShape { index: usize, found: &'static str },

    /// The holder could not be found on the context.
    #[error("holder object ({field}) was not found in context")]
    MissingHolder { field: String },

    /// The holder has no permission field of the configured name.
    #[error("{field} was not found in holder object")]
    MissingPermissionField { field: String },

    /// The permission field is neither a list of strings nor a string.
    #[error("{field} expected to be an array of strings or a space-delimited string but got: {found}")]
    WrongType { field: String, found: &'static str },

    /// A direct query asked about an empty permission.
    #[error("{kind} must be a non-empty string")]
    EmptyPermission { kind: PermissionKind },
}

/// A well-formed check the holder failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("insufficient permission")]
pub struct Denial {
    /// Which permission collection was checked.
    pub kind: PermissionKind,
    /// The requirement list that was not satisfied.
    pub required: RequirementList,
}

/// Why a gate-keeping check did not pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Rejection {
    #[error(transparent)]
    Misconfigured(#[from] Fault),

    #[error(transparent)]
    Denied(#[from] Denial),
}

impl Rejection {
    /// HTTP status a host conventionally answers with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Misconfigured(_) => 500,
            Self::Denied(_) => 403,
        }
    }

    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    #[must_use]
    pub fn is_misconfigured(&self) -> bool {
        matches!(self, Self::Misconfigured(_))
    }

    /// Returns "misconfigured" or "denied".
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Self::Misconfigured(_) => "misconfigured",
            Self::Denied(_) => "denied",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements;

    #[test]
    fn fault_messages_name_the_field() {
        let err = Fault::MissingHolder {
            field: "user".to_string(),
        };
        assert_eq!(err.to_string(), "holder object (user) was not found in context");

        let err = Fault::WrongType {
            field: "scope".to_string(),
            found: "number",
        };
        let msg = err.to_string();
        assert!(msg.contains("scope"), "got: {msg}");
        assert!(msg.contains("number"), "got: {msg}");

        let err = Fault::BadRequirementShape {
            index: 1,
            found: "boolean",
        };
        assert!(err.to_string().contains("#1"), "got: {err}");
    }

    #[test]
    fn rejection_status_codes() {
        let fault = Rejection::from(Fault::EmptyPermission {
            kind: PermissionKind::Role,
        });
        assert_eq!(fault.status_code(), 500);
        assert!(fault.is_misconfigured());
        assert_eq!(fault.class(), "misconfigured");
        assert_eq!(fault.to_string(), "role must be a non-empty string");

        let denied = Rejection::from(Denial {
            kind: PermissionKind::Scope,
            required: requirements!["user:read"],
        });
        assert_eq!(denied.status_code(), 403);
        assert!(denied.is_denied());
        assert_eq!(denied.class(), "denied");
        assert_eq!(denied.to_string(), "insufficient permission");
    }
}
