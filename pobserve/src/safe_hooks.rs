use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use pprovider::{FallbackReason, ProviderError, ProviderId, RoutingHooks};

/// Wraps routing hooks so a panicking observer cannot take down a request.
pub struct SafeRoutingHooks<H> {
    inner: H,
}

impl<H> SafeRoutingHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> RoutingHooks for SafeRoutingHooks<H>
where
    H: RoutingHooks,
{
    fn on_dispatch(&self, provider: ProviderId, model: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_dispatch(provider, model)));
    }

    fn on_success(&self, provider: ProviderId, latency: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_success(provider, latency)));
    }

    fn on_failure(&self, provider: ProviderId, error: &ProviderError) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_failure(provider, error)));
    }

    fn on_fallback(&self, reason: FallbackReason) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_fallback(reason)));
    }
}
