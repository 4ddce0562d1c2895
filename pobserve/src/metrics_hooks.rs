//! Metrics-based routing hooks.
//!
//! ```rust
//! use pobserve::MetricsRoutingHooks;
//! use pprovider::RoutingHooks;
//!
//! fn accepts_routing_hooks(_hooks: &dyn RoutingHooks) {}
//!
//! let hooks = MetricsRoutingHooks;
//! accepts_routing_hooks(&hooks);
//! ```

use std::time::Duration;

use pprovider::{FallbackReason, ProviderError, ProviderId, RoutingHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsRoutingHooks;

impl RoutingHooks for MetricsRoutingHooks {
    fn on_dispatch(&self, provider: ProviderId, model: &str) {
        metrics::counter!(
            "parley_router_dispatch_total",
            "provider" => provider.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
    }

    fn on_success(&self, provider: ProviderId, latency: Duration) {
        metrics::counter!(
            "parley_router_success_total",
            "provider" => provider.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "parley_router_latency_seconds",
            "provider" => provider.to_string()
        )
        .record(latency.as_secs_f64());
    }

    fn on_failure(&self, provider: ProviderId, error: &ProviderError) {
        metrics::counter!(
            "parley_router_failure_total",
            "provider" => provider.to_string(),
            "error_kind" => error.kind.as_str()
        )
        .increment(1);
    }

    fn on_fallback(&self, reason: FallbackReason) {
        metrics::counter!(
            "parley_router_fallback_total",
            "reason" => reason.as_str()
        )
        .increment(1);
    }
}
