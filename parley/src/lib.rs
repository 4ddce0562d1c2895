//! Unified facade over the Parley workspace crates.
//!
//! This crate is meant to be the single dependency for most applications. It
//! re-exports the provider, chat, and observability crates and adds config
//! loading, tracing setup, and runtime wiring.
//!
//! ```rust
//! use parley::{ParleyConfig, ProviderId};
//!
//! let config = ParleyConfig::from_env_with(|_| None).expect("defaults are valid");
//! let router = parley::build_router(&config).expect("router should build");
//!
//! assert!(router.available_providers().is_empty());
//! assert_eq!(router.default_provider(), Some(ProviderId::Gemini));
//! ```

mod macros;

pub mod config;
pub mod prelude;
pub mod providers;
pub mod runtime;
pub mod telemetry;
pub mod util;

pub use pchat;
pub use pcommon;
pub use pobserve;
pub use pprovider;

pub use pchat::{
    AggregateUpdate, ChatError, ChatErrorKind, ChatOrchestrator, ChatOrchestratorBuilder,
    ChatRequest, ChatResult, Conversation, ConversationStore, InMemoryConversationStore,
    NewMessage, StoredMessage,
};
pub use pcommon::{BoxFuture, GenerationConfig, ValidationError};
pub use pobserve::{MetricsRoutingHooks, SafeRoutingHooks, TracingRoutingHooks};
pub use pprovider::{
    FallbackReason, FinishReason, LOCAL_MODEL, LocalFallbackResponder, Message, NoopRoutingHooks,
    ProviderAdapter, ProviderDefaults, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderId, ProviderRegistry, ProviderResult, ProviderRouter, ProviderRouterBuilder, Role,
    RouteRequest, RoutingHooks, SecretString, SecureCredentialManager,
};

pub use config::{ConfigError, ConfigErrorKind, ParleyConfig};
pub use providers::{ProviderBuildConfig, build_adapter, build_adapter_from_api_key};
pub use runtime::{
    build_orchestrator, build_orchestrator_with_store, build_router, build_router_with_hooks,
    default_routing_hooks,
};
pub use telemetry::init_tracing;
pub use util::{
    assistant_message, chat_request, follow_up, generation_config, parse_provider_id,
    system_message, user_message,
};
