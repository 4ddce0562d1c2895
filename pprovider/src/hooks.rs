use std::time::Duration;

use crate::{ProviderError, ProviderErrorKind, ProviderId};

/// Why a request ended up at the local responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NoAdapter,
    AdapterFailed(ProviderErrorKind),
}

impl FallbackReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoAdapter => "no_adapter",
            Self::AdapterFailed(_) => "adapter_failed",
        }
    }
}

/// Observes routing decisions. Every method defaults to a no-op.
pub trait RoutingHooks: Send + Sync {
    fn on_dispatch(&self, _provider: ProviderId, _model: &str) {}

    fn on_success(&self, _provider: ProviderId, _latency: Duration) {}

    fn on_failure(&self, _provider: ProviderId, _error: &ProviderError) {}

    fn on_fallback(&self, _reason: FallbackReason) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRoutingHooks;

impl RoutingHooks for NoopRoutingHooks {}
