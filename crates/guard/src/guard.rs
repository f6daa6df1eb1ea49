//! The guard facade: direct queries and gate-keeping checks.

use crate::config::Config;
use crate::{
    Check, Context, Fault, GuardBuilder, GuardOptions, IntoRequirements, PermissionKind,
    PermissionSet, SetupError, extract,
};
use std::sync::Arc;
use tracing::debug;

/// Evaluates role and scope requirements against a context.
///
/// Cheap to clone; all clones share one immutable configuration.
#[derive(Debug, Clone)]
pub struct Guard {
    config: Arc<Config>,
}

impl Guard {
    /// Build a guard from options alone (no override handler object).
    pub fn new(options: GuardOptions) -> Result<Self, SetupError> {
        GuardBuilder::new().options(options).build()
    }

    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }

    pub(crate) fn from_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn has_override_handler(&self) -> bool {
        self.config.handler.is_some()
    }

    /// Whether the holder has `role`.
    ///
    /// Returns `Ok(false)` when it does not; errors only on malformed input.
    pub fn has_role<C: Context + ?Sized>(&self, context: &C, role: &str) -> Result<bool, Fault> {
        self.has_permission(context, role, PermissionKind::Role)
    }

    /// Whether the holder has `scope`.
    pub fn has_scope<C: Context + ?Sized>(&self, context: &C, scope: &str) -> Result<bool, Fault> {
        self.has_permission(context, scope, PermissionKind::Scope)
    }

    pub fn has_permission<C: Context + ?Sized>(
        &self,
        context: &C,
        permission: &str,
        kind: PermissionKind,
    ) -> Result<bool, Fault> {
        if permission.is_empty() {
            return Err(Fault::EmptyPermission { kind });
        }
        let held = self.permissions(context, kind)?;
        let found = held.contains(permission);
        debug!(%kind, permission, found, "permission query");
        Ok(found)
    }

    /// The holder's normalized roles or scopes.
    pub fn permissions<C: Context + ?Sized>(
        &self,
        context: &C,
        kind: PermissionKind,
    ) -> Result<PermissionSet, Fault> {
        extract(context, &self.config.holder, self.config.permission_field(kind))
    }

    /// A check passing when the holder's roles satisfy `requirements`.
    pub fn require_role(&self, requirements: impl IntoRequirements) -> Check {
        self.require(PermissionKind::Role, requirements)
    }

    /// A check passing when the holder's scopes satisfy `requirements`.
    pub fn require_scope(&self, requirements: impl IntoRequirements) -> Check {
        self.require(PermissionKind::Scope, requirements)
    }

    pub fn require(&self, kind: PermissionKind, requirements: impl IntoRequirements) -> Check {
        Check::new(
            Arc::clone(&self.config),
            kind,
            requirements.into_requirements(),
        )
    }
}
