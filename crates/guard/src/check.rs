//! Gate-keeping checks produced by [`Guard::require_role`] and
//! [`Guard::require_scope`].
//!
//! [`Guard::require_role`]: crate::Guard::require_role
//! [`Guard::require_scope`]: crate::Guard::require_scope

use crate::config::Config;
use crate::{
    Context, Denial, Fault, PermissionKind, Rejection, RequirementList, Responder, extract,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of evaluating a check against one context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Allowed,
    Denied(Denial),
    Misconfigured(Fault),
}

impl Outcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    pub fn is_misconfigured(&self) -> bool {
        matches!(self, Self::Misconfigured(_))
    }

    /// Returns "allowed", "denied" or "misconfigured".
    pub fn status_str(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Denied(_) => "denied",
            Self::Misconfigured(_) => "misconfigured",
        }
    }

    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(denial) => Err(Rejection::Denied(denial)),
            Self::Misconfigured(fault) => Err(Rejection::Misconfigured(fault)),
        }
    }
}

/// What the host should do after [`Check::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The requirement is satisfied; proceed with the guarded operation.
    Continue,
    /// The response has been handled; stop processing.
    Halt,
}

impl Flow {
    pub fn is_continue(self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// A reusable check bound to one requirement list.
///
/// Requirement-shape faults are kept and reported on every evaluation, so a
/// malformed route configuration answers as misconfigured whatever the
/// holder holds.
#[derive(Debug, Clone)]
pub struct Check {
    config: Arc<Config>,
    kind: PermissionKind,
    requirements: Result<RequirementList, Fault>,
}

impl Check {
    pub(crate) fn new(
        config: Arc<Config>,
        kind: PermissionKind,
        requirements: Result<RequirementList, Fault>,
    ) -> Self {
        Self {
            config,
            kind,
            requirements,
        }
    }

    pub fn kind(&self) -> PermissionKind {
        self.kind
    }

    /// The requirement list, or the shape fault it was rejected with.
    pub fn requirements(&self) -> Result<&RequirementList, &Fault> {
        self.requirements.as_ref()
    }

    /// Evaluate without touching any responder.
    pub fn evaluate<C: Context + ?Sized>(&self, context: &C) -> Outcome {
        let requirements = match &self.requirements {
            Ok(requirements) => requirements,
            Err(fault) => {
                warn!(kind = %self.kind, %fault, "malformed requirement list");
                return Outcome::Misconfigured(fault.clone());
            }
        };

        let field = self.config.permission_field(self.kind);
        let held = match extract(context, &self.config.holder, field) {
            Ok(held) => held,
            Err(fault) => {
                warn!(kind = %self.kind, holder = %self.config.holder, %fault, "cannot read permissions");
                return Outcome::Misconfigured(fault);
            }
        };

        if requirements.evaluate(&held) {
            debug!(kind = %self.kind, entries = requirements.len(), "check passed");
            Outcome::Allowed
        } else {
            debug!(kind = %self.kind, entries = requirements.len(), held = held.len(), "check denied");
            Outcome::Denied(Denial {
                kind: self.kind,
                required: requirements.clone(),
            })
        }
    }

    /// Evaluate and, on rejection, hand the response to the override handler
    /// if one is configured, or to [`Responder::reject`] otherwise.
    pub fn run<C: Context>(&self, context: &C, responder: &mut dyn Responder) -> Flow {
        let Err(rejection) = self.evaluate(context).into_result() else {
            return Flow::Continue;
        };

        match &self.config.handler {
            Some(handler) => handler.handle(&rejection, context, responder),
            None => responder.reject(&rejection),
        }
        Flow::Halt
    }
}
