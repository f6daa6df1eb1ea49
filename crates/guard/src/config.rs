//! Guard configuration, loaded from TOML or built in code.

use crate::path::InvalidFieldPath;
use crate::{FieldPath, Guard, OverrideHandler};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_HOLDER_FIELD: &str = "user";
pub const DEFAULT_ROLES_FIELD: &str = "role";
pub const DEFAULT_SCOPES_FIELD: &str = "scope";

/// Which permission collection on the holder a check reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    Role,
    Scope,
}

impl PermissionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Scope => "scope",
        }
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied options, merged over the defaults.
///
/// ```toml
/// holder_field = "auth.user"
/// roles_field = "roles"
/// scopes_field = "scope"
/// override_handler = "json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardOptions {
    /// Context field holding the holder.
    pub holder_field: String,

    /// Holder field holding roles.
    pub roles_field: String,

    /// Holder field holding scopes.
    pub scopes_field: String,

    /// Name of a handler registered with [`GuardBuilder::register_handler`].
    pub override_handler: Option<String>,
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self {
            holder_field: DEFAULT_HOLDER_FIELD.to_string(),
            roles_field: DEFAULT_ROLES_FIELD.to_string(),
            scopes_field: DEFAULT_SCOPES_FIELD.to_string(),
            override_handler: None,
        }
    }
}

impl GuardOptions {
    /// Load options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse options from a TOML string.
    pub fn parse(toml: &str) -> Result<Self, SetupError> {
        toml::from_str(toml).map_err(|e| SetupError::Parse(e.to_string()))
    }
}

/// Invalid configuration found while building a [`Guard`].
///
/// Setup errors abort engine construction; they never surface per request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SetupError {
    #[error(transparent)]
    InvalidFieldPath(#[from] InvalidFieldPath),

    #[error("override handler '{0}' is not registered")]
    UnknownOverrideHandler(String),

    #[error(
        "ambiguous override handler: set either a handler or override_handler = \"{0}\", not both"
    )]
    AmbiguousOverrideHandler(String),

    #[error("failed to read guard options: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse guard options: {0}")]
    Parse(String),
}

/// Validated, immutable configuration shared by a guard and its checks.
pub(crate) struct Config {
    pub(crate) holder: FieldPath,
    pub(crate) roles: FieldPath,
    pub(crate) scopes: FieldPath,
    pub(crate) handler: Option<Arc<dyn OverrideHandler>>,
}

impl Config {
    pub(crate) fn permission_field(&self, kind: PermissionKind) -> &FieldPath {
        match kind {
            PermissionKind::Role => &self.roles,
            PermissionKind::Scope => &self.scopes,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("holder", &self.holder)
            .field("roles", &self.roles)
            .field("scopes", &self.scopes)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Builder for [`Guard`].
#[derive(Default)]
pub struct GuardBuilder {
    options: GuardOptions,
    handler: Option<Arc<dyn OverrideHandler>>,
    registry: HashMap<String, Arc<dyn OverrideHandler>>,
}

impl GuardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    pub fn options(mut self, options: GuardOptions) -> Self {
        self.options = options;
        self
    }

    pub fn holder_field(mut self, field: impl Into<String>) -> Self {
        self.options.holder_field = field.into();
        self
    }

    pub fn roles_field(mut self, field: impl Into<String>) -> Self {
        self.options.roles_field = field.into();
        self
    }

    pub fn scopes_field(mut self, field: impl Into<String>) -> Self {
        self.options.scopes_field = field.into();
        self
    }

    /// Route every rejected check to `handler` instead of the responder's
    /// default path.
    pub fn override_handler(mut self, handler: impl OverrideHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Closure form of [`override_handler`](Self::override_handler).
    pub fn override_fn<F>(self, handler: F) -> Self
    where
        F: Fn(&crate::Rejection, &dyn crate::Context, &mut dyn crate::Responder)
            + Send
            + Sync
            + 'static,
    {
        self.override_handler(handler)
    }

    /// Make a handler selectable by name from [`GuardOptions::override_handler`].
    pub fn register_handler(
        mut self,
        name: impl Into<String>,
        handler: impl OverrideHandler + 'static,
    ) -> Self {
        self.registry.insert(name.into(), Arc::new(handler));
        self
    }

    /// Validate the options and build the guard.
    pub fn build(self) -> Result<Guard, SetupError> {
        let Self {
            options,
            handler,
            mut registry,
        } = self;

        let handler = match (handler, options.override_handler.as_deref()) {
            (Some(handler), None) => Some(handler),
            (None, Some(name)) => Some(
                registry
                    .remove(name)
                    .ok_or_else(|| SetupError::UnknownOverrideHandler(name.to_string()))?,
            ),
            (Some(_), Some(name)) => {
                return Err(SetupError::AmbiguousOverrideHandler(name.to_string()));
            }
            (None, None) => None,
        };

        let config = Config {
            holder: FieldPath::parse(&options.holder_field)?,
            roles: FieldPath::parse(&options.roles_field)?,
            scopes: FieldPath::parse(&options.scopes_field)?,
            handler,
        };

        info!(
            holder = %config.holder,
            roles = %config.roles,
            scopes = %config.scopes,
            override_handler = config.handler.is_some(),
            "guard configured"
        );

        Ok(Guard::from_config(config))
    }
}
