//! Tracing-based routing hooks.
//!
//! ```rust
//! use pobserve::TracingRoutingHooks;
//! use pprovider::RoutingHooks;
//!
//! fn accepts_routing_hooks(_hooks: &dyn RoutingHooks) {}
//!
//! let hooks = TracingRoutingHooks;
//! accepts_routing_hooks(&hooks);
//! ```

use std::time::Duration;

use pprovider::{FallbackReason, ProviderError, ProviderId, RoutingHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRoutingHooks;

impl RoutingHooks for TracingRoutingHooks {
    fn on_dispatch(&self, provider: ProviderId, model: &str) {
        tracing::info!(
            phase = "router",
            event = "dispatch",
            provider = %provider,
            model
        );
    }

    fn on_success(&self, provider: ProviderId, latency: Duration) {
        tracing::info!(
            phase = "router",
            event = "success",
            provider = %provider,
            latency_ms = latency.as_millis() as u64
        );
    }

    fn on_failure(&self, provider: ProviderId, error: &ProviderError) {
        tracing::error!(
            phase = "router",
            event = "failure",
            provider = %provider,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_fallback(&self, reason: FallbackReason) {
        match reason {
            FallbackReason::NoAdapter => tracing::info!(
                phase = "router",
                event = "fallback",
                reason = reason.as_str()
            ),
            FallbackReason::AdapterFailed(kind) => tracing::warn!(
                phase = "router",
                event = "fallback",
                reason = reason.as_str(),
                error_kind = ?kind
            ),
        }
    }
}
