//! Production-friendly observability hooks for provider routing.
//!
//! ```rust
//! use pobserve::{MetricsRoutingHooks, SafeRoutingHooks, TracingRoutingHooks};
//!
//! let _routing_hooks = SafeRoutingHooks::new(TracingRoutingHooks);
//! let _metrics = MetricsRoutingHooks;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsRoutingHooks;
pub use safe_hooks::SafeRoutingHooks;
pub use tracing_hooks::TracingRoutingHooks;

pub mod prelude {
    pub use crate::{MetricsRoutingHooks, SafeRoutingHooks, TracingRoutingHooks};
}
