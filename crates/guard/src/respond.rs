//! The host's response channel and the override hook.

use crate::{Context, Rejection};

/// Out-channel a host passes to [`Check::run`](crate::Check::run).
pub trait Responder {
    /// Default signalling path for a rejected check. Hosts usually map this
    /// to [`Rejection::status_code`].
    fn reject(&mut self, rejection: &Rejection);

    /// Write a complete response. Override handlers use this.
    fn send(&mut self, status: u16, body: String);
}

/// Takes over the response for every rejected check.
///
/// Configured once on the [`GuardBuilder`](crate::GuardBuilder); when
/// present, neither faults nor denials reach [`Responder::reject`].
pub trait OverrideHandler: Send + Sync {
    fn handle(&self, rejection: &Rejection, context: &dyn Context, responder: &mut dyn Responder);
}

impl<F> OverrideHandler for F
where
    F: Fn(&Rejection, &dyn Context, &mut dyn Responder) + Send + Sync,
{
    fn handle(&self, rejection: &Rejection, context: &dyn Context, responder: &mut dyn Responder) {
        self(rejection, context, responder)
    }
}

/// In-memory responder: records what the guard or a handler decided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub status: Option<u16>,
    pub body: Option<String>,
    /// Set only on the default path.
    pub rejection: Option<Rejection>,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sent(&self) -> bool {
        self.status.is_some()
    }
}

impl Responder for Reply {
    fn reject(&mut self, rejection: &Rejection) {
        self.status = Some(rejection.status_code());
        self.body = Some(rejection.to_string());
        self.rejection = Some(rejection.clone());
    }

    fn send(&mut self, status: u16, body: String) {
        self.status = Some(status);
        self.body = Some(body);
    }
}
