//! Runtime wiring: config in, router and orchestrator out.

use std::sync::Arc;
use std::time::Duration;

use pobserve::{SafeRoutingHooks, TracingRoutingHooks};

use crate::providers::{ProviderBuildConfig, build_adapter};
use crate::{
    ChatOrchestrator, ConfigError, ConversationStore, InMemoryConversationStore, ParleyConfig,
    ProviderId, ProviderRouter, RoutingHooks,
};

pub fn default_routing_hooks() -> Arc<dyn RoutingHooks> {
    Arc::new(SafeRoutingHooks::new(TracingRoutingHooks))
}

pub fn build_router(config: &ParleyConfig) -> Result<ProviderRouter, ConfigError> {
    build_router_with_hooks(config, default_routing_hooks())
}

/// Registers OpenAI then Gemini for every configured key. A key that fails
/// validation is logged and skipped; requests then fall back locally.
pub fn build_router_with_hooks(
    config: &ParleyConfig,
    hooks: Arc<dyn RoutingHooks>,
) -> Result<ProviderRouter, ConfigError> {
    config.validate()?;

    let timeout = config.request_timeout_secs.map(Duration::from_secs);

    let candidates = [
        (
            ProviderId::OpenAi,
            config.openai_api_key.as_deref(),
            config.openai_base_url.as_deref(),
        ),
        (
            ProviderId::Gemini,
            config.gemini_api_key.as_deref(),
            config.gemini_base_url.as_deref(),
        ),
    ];

    let mut builder = ProviderRouter::builder()
        .defaults(config.provider_defaults())
        .default_provider_name(&config.default_provider)
        .hooks(hooks);

    for (provider_id, api_key, base_url) in candidates {
        let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) else {
            continue;
        };

        let mut build = ProviderBuildConfig::new(provider_id, api_key);
        if let Some(timeout) = timeout {
            build = build.with_timeout(timeout);
        }
        if let Some(base_url) = base_url {
            build = build.with_base_url(base_url);
        }

        match build_adapter(build) {
            Ok(adapter) => {
                tracing::debug!(phase = "runtime", event = "adapter_registered", provider = %provider_id);
                builder = builder.register_arc(adapter);
            }
            Err(err) => {
                tracing::warn!(
                    phase = "runtime",
                    event = "adapter_skipped",
                    provider = %provider_id,
                    error = %err
                );
            }
        }
    }

    Ok(builder.build())
}

pub fn build_orchestrator(config: &ParleyConfig) -> Result<ChatOrchestrator, ConfigError> {
    build_orchestrator_with_store(config, Arc::new(InMemoryConversationStore::new()))
}

pub fn build_orchestrator_with_store(
    config: &ParleyConfig,
    store: Arc<dyn ConversationStore>,
) -> Result<ChatOrchestrator, ConfigError> {
    let router = Arc::new(build_router(config)?);
    let mut builder = ChatOrchestrator::builder(router)
        .store(store)
        .history_window(config.history_window);

    if let Some(system_prompt) = config.system_prompt.as_deref() {
        builder = builder.system_prompt(system_prompt);
    }

    Ok(builder.build())
}
