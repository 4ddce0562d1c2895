//! Adapter construction from plain credentials.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::{ConfigError, ProviderAdapter, ProviderId, SecureCredentialManager};

#[derive(Clone)]
pub struct ProviderBuildConfig {
    pub provider_id: ProviderId,
    pub api_key: String,
    pub base_url: Option<String>,
    /// Client-side request timeout; `None` leaves calls unbounded.
    pub timeout: Option<Duration>,
}

impl ProviderBuildConfig {
    pub fn new(provider_id: ProviderId, api_key: impl Into<String>) -> Self {
        Self {
            provider_id,
            api_key: api_key.into(),
            base_url: None,
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl std::fmt::Debug for ProviderBuildConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderBuildConfig")
            .field("provider_id", &self.provider_id)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub fn build_adapter_from_api_key(
    provider_id: ProviderId,
    api_key: impl Into<String>,
) -> Result<Arc<dyn ProviderAdapter>, ConfigError> {
    build_adapter(ProviderBuildConfig::new(provider_id, api_key))
}

/// Validates the key format for the provider and builds an HTTP-backed adapter.
pub fn build_adapter(config: ProviderBuildConfig) -> Result<Arc<dyn ProviderAdapter>, ConfigError> {
    let api_key = config.api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(ConfigError::invalid(format!(
            "{} API key must not be empty",
            config.provider_id
        )));
    }

    let credentials = Arc::new(SecureCredentialManager::new());
    let mut http = Client::builder();
    if let Some(timeout) = config.timeout {
        http = http.timeout(timeout);
    }
    let http = http
        .build()
        .map_err(|err| ConfigError::invalid(format!("failed to build HTTP client: {err}")))?;

    match config.provider_id {
        ProviderId::OpenAi => build_openai_adapter(credentials, api_key, config.base_url, http),
        ProviderId::Gemini => build_gemini_adapter(credentials, api_key, config.base_url, http),
        ProviderId::Local => Err(ConfigError::invalid(
            "the local responder is built into the router and takes no credentials",
        )),
    }
}

#[cfg(feature = "provider-openai")]
fn build_openai_adapter(
    credentials: Arc<SecureCredentialManager>,
    api_key: String,
    base_url: Option<String>,
    http: Client,
) -> Result<Arc<dyn ProviderAdapter>, ConfigError> {
    credentials.set_openai_api_key(api_key)?;
    let transport = Arc::new(pprovider::HttpTransport::new(http));
    let mut adapter = pprovider::OpenAiAdapter::new(credentials, transport);
    if let Some(base_url) = base_url {
        adapter = adapter.with_base_url(base_url);
    }
    Ok(Arc::new(adapter))
}

#[cfg(not(feature = "provider-openai"))]
fn build_openai_adapter(
    _credentials: Arc<SecureCredentialManager>,
    _api_key: String,
    _base_url: Option<String>,
    _http: Client,
) -> Result<Arc<dyn ProviderAdapter>, ConfigError> {
    Err(ConfigError::invalid(
        "provider-openai feature is not enabled on parley",
    ))
}

#[cfg(feature = "provider-gemini")]
fn build_gemini_adapter(
    credentials: Arc<SecureCredentialManager>,
    api_key: String,
    base_url: Option<String>,
    http: Client,
) -> Result<Arc<dyn ProviderAdapter>, ConfigError> {
    credentials.set_gemini_api_key(api_key)?;
    let transport = Arc::new(pprovider::HttpTransport::new(http));
    let mut adapter = pprovider::GeminiAdapter::new(credentials, transport);
    if let Some(base_url) = base_url {
        adapter = adapter.with_base_url(base_url);
    }
    Ok(Arc::new(adapter))
}

#[cfg(not(feature = "provider-gemini"))]
fn build_gemini_adapter(
    _credentials: Arc<SecureCredentialManager>,
    _api_key: String,
    _base_url: Option<String>,
    _http: Client,
) -> Result<Arc<dyn ProviderAdapter>, ConfigError> {
    Err(ConfigError::invalid(
        "provider-gemini feature is not enabled on parley",
    ))
}
