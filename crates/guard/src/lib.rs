//! Role and scope permission checks over a host-supplied context.
//!
//! A host (an HTTP framework, an RPC layer, a job runner) attaches an
//! authenticated holder to some context object. The guard reads the holder's
//! roles or scopes from that context and decides whether a requirement is
//! met, keeping caller mistakes apart from genuine denials.
//!
//! # Core Concepts
//!
//! - [`RequirementList`]: entries combined with OR; a [`Requirement::Group`]
//!   entry is an AND of its members. An empty list never allows.
//! - [`PermissionSet`]: a holder's roles or scopes, read from an array of
//!   strings or a space-delimited string.
//! - [`Guard`]: built once from [`GuardOptions`], then shared. It answers
//!   direct queries ([`Guard::has_role`]) and produces reusable [`Check`]s
//!   ([`Guard::require_role`]).
//! - [`Rejection`]: either a [`Fault`] (misconfiguration, conventionally
//!   500) or a [`Denial`] (insufficient permission, conventionally 403).
//!
//! # Example
//!
//! ```
//! use guard::{Flow, Guard, GuardOptions, Reply, requirements};
//! use serde_json::json;
//!
//! let guard = Guard::new(GuardOptions::default())?;
//! let request = json!({
//!     "user": { "role": ["user", "admin"], "scope": "profile email" }
//! });
//!
//! assert_eq!(guard.has_role(&request, "admin"), Ok(true));
//! assert_eq!(guard.has_scope(&request, "openid"), Ok(false));
//!
//! // "admin" OR ("profile" AND "email")
//! let check = guard.require_scope(requirements!["admin", ["profile", "email"]]);
//! let mut reply = Reply::new();
//! assert_eq!(check.run(&request, &mut reply), Flow::Continue);
//!
//! let check = guard.require_role(requirements![["admin", "auditor"]]);
//! assert_eq!(check.run(&request, &mut reply), Flow::Halt);
//! assert_eq!(reply.status, Some(403));
//! # Ok::<(), guard::SetupError>(())
//! ```

mod check;
mod config;
mod context;
mod error;
mod extract;
mod guard;
mod path;
mod requirement;
mod respond;

pub use check::{Check, Flow, Outcome};
pub use config::{
    DEFAULT_HOLDER_FIELD, DEFAULT_ROLES_FIELD, DEFAULT_SCOPES_FIELD, GuardBuilder, GuardOptions,
    PermissionKind, SetupError,
};
pub use context::Context;
pub use error::{Denial, Fault, Rejection};
pub use extract::{PermissionSet, extract};
pub use guard::Guard;
pub use path::{FieldPath, InvalidFieldPath};
pub use requirement::{IntoRequirements, Requirement, RequirementList, evaluate};
pub use respond::{OverrideHandler, Reply, Responder};

/// Build a [`RequirementList`], one entry per argument.
///
/// A string is a leaf; an array of strings is an AND group:
///
/// ```
/// use guard::{Requirement, requirements};
///
/// // "admin" OR "editor"
/// let any = requirements!["admin", "editor"];
/// assert_eq!(any.len(), 2);
///
/// // "admin" AND "editor"
/// let all = requirements![["admin", "editor"]];
/// assert_eq!(all.entries(), &[Requirement::group(["admin", "editor"])]);
/// ```
#[macro_export]
macro_rules! requirements {
    () => {
        $crate::RequirementList::default()
    };
    ($($entry:expr),+ $(,)?) => {
        $crate::RequirementList::new(vec![$($crate::Requirement::from($entry)),+])
    };
}
