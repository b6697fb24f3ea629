//! Per-call context for quoting
//!
//! The crate never installs a global subscriber. Callers that want the
//! swap/tick/bitmap events pass a `ClmmContext` carrying their own
//! `tracing::Dispatch`; every event of the call is emitted to it, inside a
//! span tagged with the pool id and the operation name.

use anchor_lang::prelude::Pubkey;
use tracing::{dispatcher, Dispatch};

#[derive(Clone, Debug, Default)]
pub struct ClmmContext {
    dispatch: Option<Dispatch>,
}

impl ClmmContext {
    /// Context whose events go to whatever dispatcher is already current
    pub fn new() -> Self {
        Self::default()
    }

    /// Context routing every event of the call to `dispatch`
    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    pub fn dispatch(&self) -> Option<&Dispatch> {
        self.dispatch.as_ref()
    }

    /// Run `f` under this context's dispatcher, inside a span for `pool_id`
    pub fn in_scope<T>(&self, pool_id: &Pubkey, operation: &'static str, f: impl FnOnce() -> T) -> T {
        let run = || {
            let span = tracing::debug_span!("clmm", pool = %pool_id, op = operation);
            span.in_scope(f)
        };
        match &self.dispatch {
            Some(dispatch) => dispatcher::with_default(dispatch, run),
            None => run(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_scope_returns_value() {
        let ctx = ClmmContext::new();
        assert!(ctx.dispatch().is_none());
        assert_eq!(ctx.in_scope(&Pubkey::default(), "test", || 41 + 1), 42);
    }

    #[test]
    fn test_with_dispatch_routes_events() {
        let ctx = ClmmContext::with_dispatch(Dispatch::new(tracing_subscriber::registry()));
        assert!(ctx.dispatch().is_some());
        let routed = ctx.in_scope(&Pubkey::new_unique(), "test", || {
            dispatcher::get_default(|current| current.is::<tracing_subscriber::Registry>())
        });
        assert!(routed);
        assert!(!dispatcher::get_default(|current| current.is::<tracing_subscriber::Registry>()));
    }
}
