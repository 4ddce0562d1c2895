//! Common `pprovider` imports for downstream crates.

pub use crate::{
    FallbackReason, FinishReason, LocalFallbackResponder, Message, NoopRoutingHooks,
    ProviderAdapter, ProviderDefaults, ProviderError, ProviderErrorKind, ProviderId,
    ProviderRegistry, ProviderResult, ProviderRouter, ProviderRouterBuilder, Role, RouteRequest,
    RoutingHooks, SecureCredentialManager,
};
pub use pcommon::{BoxFuture, GenerationConfig};
