//! Provider selection with a guaranteed local answer.
//!
//! Selection walks a fixed chain: the requested provider, the configured
//! default, [`ProviderRouter::PREFERRED_PROVIDER`], then the first registered
//! adapter. The chosen adapter gets exactly one attempt; any failure, and the
//! case where nothing is registered, is answered by the local responder, so
//! [`ProviderRouter::route`] has no error path.
//!
//! ```rust
//! use pprovider::{ProviderId, ProviderRouter};
//!
//! let router = ProviderRouter::builder().default_provider(ProviderId::OpenAi).build();
//!
//! assert!(router.available_providers().is_empty());
//! assert!(router.select(Some("gemini")).is_none());
//! assert_eq!(router.defaults().model_for(ProviderId::Gemini), "gemini-2.5-flash");
//! ```

use std::sync::Arc;

use pcommon::GenerationConfig;

use crate::{
    FallbackReason, LOCAL_MODEL, LocalFallbackResponder, Message, NoopRoutingHooks,
    ProviderAdapter, ProviderError, ProviderId, ProviderRegistry, ProviderResult, RoutingHooks,
};

/// Generation parameters used when a request carries no config of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDefaults {
    pub temperature: f32,
    pub max_tokens: u32,
    pub openai_model: String,
    pub gemini_model: String,
}

impl Default for ProviderDefaults {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4000,
            openai_model: "gpt-3.5-turbo".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
        }
    }
}

impl ProviderDefaults {
    pub fn model_for(&self, provider: ProviderId) -> &str {
        match provider {
            ProviderId::OpenAi => &self.openai_model,
            ProviderId::Gemini => &self.gemini_model,
            ProviderId::Local => LOCAL_MODEL,
        }
    }

    pub fn config_for(&self, provider: ProviderId) -> GenerationConfig {
        self.config_with_model(self.model_for(provider))
    }

    pub fn config_with_model(&self, model: impl Into<String>) -> GenerationConfig {
        GenerationConfig::new(model)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub messages: Vec<Message>,
    /// Caller-supplied provider name; unknown names fall through the chain.
    pub provider: Option<String>,
    pub config: Option<GenerationConfig>,
}

impl RouteRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            provider: None,
            config: None,
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = Some(config);
        self
    }
}

pub struct ProviderRouterBuilder {
    registry: ProviderRegistry,
    default_provider: Option<ProviderId>,
    defaults: ProviderDefaults,
    hooks: Arc<dyn RoutingHooks>,
}

impl ProviderRouterBuilder {
    pub fn new() -> Self {
        Self {
            registry: ProviderRegistry::new(),
            default_provider: None,
            defaults: ProviderDefaults::default(),
            hooks: Arc::new(NoopRoutingHooks),
        }
    }

    pub fn register<A>(mut self, adapter: A) -> Self
    where
        A: ProviderAdapter + 'static,
    {
        self.registry.register(adapter);
        self
    }

    pub fn register_arc(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.registry.register_arc(adapter);
        self
    }

    pub fn registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn default_provider(mut self, provider: ProviderId) -> Self {
        self.default_provider = Some(provider);
        self
    }

    /// Parses a configured provider name; an unknown name clears the default.
    pub fn default_provider_name(mut self, name: &str) -> Self {
        self.default_provider = ProviderId::parse(name);
        self
    }

    pub fn defaults(mut self, defaults: ProviderDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn RoutingHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn build(self) -> ProviderRouter {
        ProviderRouter {
            registry: self.registry,
            default_provider: self.default_provider,
            defaults: self.defaults,
            hooks: self.hooks,
            local: LocalFallbackResponder::new(),
        }
    }
}

impl Default for ProviderRouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ProviderRouter {
    registry: ProviderRegistry,
    default_provider: Option<ProviderId>,
    defaults: ProviderDefaults,
    hooks: Arc<dyn RoutingHooks>,
    local: LocalFallbackResponder,
}

impl ProviderRouter {
    pub const PREFERRED_PROVIDER: ProviderId = ProviderId::Gemini;

    pub fn builder() -> ProviderRouterBuilder {
        ProviderRouterBuilder::new()
    }

    pub fn new(registry: ProviderRegistry) -> Self {
        Self::builder().registry(registry).build()
    }

    pub fn defaults(&self) -> &ProviderDefaults {
        &self.defaults
    }

    pub fn default_provider(&self) -> Option<ProviderId> {
        self.default_provider
    }

    pub fn available_providers(&self) -> Vec<ProviderId> {
        self.registry.ids()
    }

    pub fn has_adapter(&self, provider: ProviderId) -> bool {
        self.registry.contains(provider)
    }

    /// Returns the adapter that would serve a request naming `requested`, or
    /// `None` when the request will be answered locally.
    pub fn select(&self, requested: Option<&str>) -> Option<Arc<dyn ProviderAdapter>> {
        requested
            .and_then(ProviderId::parse)
            .and_then(|id| self.registry.get(id))
            .or_else(|| self.default_provider.and_then(|id| self.registry.get(id)))
            .or_else(|| self.registry.get(Self::PREFERRED_PROVIDER))
            .or_else(|| self.registry.first())
    }

    pub fn resolve_config(
        &self,
        provider: ProviderId,
        config: Option<GenerationConfig>,
    ) -> GenerationConfig {
        config.unwrap_or_else(|| self.defaults.config_for(provider))
    }

    pub async fn route(&self, request: RouteRequest) -> ProviderResult {
        let RouteRequest {
            messages,
            provider,
            config,
        } = request;

        let Some(adapter) = self.select(provider.as_deref()) else {
            tracing::info!(
                phase = "router",
                event = "local_fallback",
                requested = provider.as_deref().unwrap_or("none"),
                "no provider adapter available, answering locally"
            );
            self.hooks.on_fallback(FallbackReason::NoAdapter);
            return self.local.respond(&messages);
        };

        let provider_id = adapter.id();
        let config = self.resolve_config(provider_id, config);
        tracing::debug!(
            phase = "router",
            event = "dispatch",
            provider = %provider_id,
            model = %config.model,
            messages = messages.len()
        );
        self.hooks.on_dispatch(provider_id, &config.model);

        let outcome = adapter
            .generate(messages.clone(), config)
            .await
            .and_then(|result| {
                if result.text.trim().is_empty() {
                    Err(ProviderError::malformed_response(
                        "provider returned an empty reply",
                    ))
                } else {
                    Ok(result)
                }
            });

        match outcome {
            Ok(result) => {
                self.hooks.on_success(provider_id, result.latency);
                result
            }
            Err(error) => {
                tracing::warn!(
                    phase = "router",
                    event = "adapter_failed",
                    provider = %provider_id,
                    error_kind = ?error.kind,
                    error = %error,
                    "provider failed, answering locally"
                );
                self.hooks.on_failure(provider_id, &error);
                self.hooks.on_fallback(FallbackReason::AdapterFailed(error.kind));
                self.local.respond(&messages)
            }
        }
    }
}

impl std::fmt::Debug for ProviderRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRouter")
            .field("registry", &self.registry)
            .field("default_provider", &self.default_provider)
            .field("defaults", &self.defaults)
            .finish()
    }
}
