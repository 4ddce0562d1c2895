//! Google Gemini `generateContent` adapter.
//!
//! Gemini receives the conversation flattened into one prompt. Its reply shape
//! has drifted across API versions, so the adapter leans on the full Gemini
//! extraction chain in [`ResponseExtractor::gemini`].

use std::sync::Arc;
use std::time::Instant;

use pcommon::GenerationConfig;
use serde_json::{Value, json};

use crate::extract::{ResponseExtractor, estimate_tokens};
use crate::transport::{ProviderTransport, TransportAuth, TransportRequest};
use crate::{
    FinishReason, Message, ProviderAdapter, ProviderError, ProviderFuture, ProviderId,
    ProviderResult, Role, SecureCredentialManager,
};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn ProviderTransport>,
    base_url: String,
    extractor: ResponseExtractor,
}

impl GeminiAdapter {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn ProviderTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            base_url: GEMINI_BASE_URL.to_string(),
            extractor: ResponseExtractor::gemini(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_extractor(mut self, extractor: ResponseExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Flattens the message list into role-labelled blocks and leaves the
    /// prompt open for the assistant's turn.
    pub fn flatten_prompt(messages: &[Message]) -> String {
        let mut blocks = messages
            .iter()
            .map(|message| {
                let label = match message.role {
                    Role::System => "System",
                    Role::User => "User",
                    Role::Assistant => "Assistant",
                };
                format!("{label}: {}", message.content)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        blocks.push_str("\n\nAssistant:");
        blocks
    }

    pub fn build_body(messages: &[Message], config: &GenerationConfig) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": Self::flatten_prompt(messages) }]
            }],
            "generationConfig": {
                "temperature": config.temperature,
                "maxOutputTokens": config.max_tokens,
                "topP": config.top_p
            }
        })
    }

    fn convert_response(&self, payload: &Value, config: &GenerationConfig) -> ProviderResult {
        let extracted = self.extractor.extract(payload);
        tracing::trace!(
            provider = %ProviderId::Gemini,
            strategy = extracted.strategy.unwrap_or("raw_dump"),
            "extracted gemini reply"
        );

        let tokens_used = payload
            .get("usageMetadata")
            .and_then(|usage| usage.get("totalTokenCount"))
            .and_then(Value::as_u64)
            .and_then(|tokens| u32::try_from(tokens).ok())
            .unwrap_or_else(|| estimate_tokens(&extracted.text));
        let finish_reason = payload
            .get("candidates")
            .and_then(|candidates| candidates.get(0))
            .and_then(|candidate| candidate.get("finishReason"))
            .and_then(Value::as_str)
            .map_or(FinishReason::Stop, FinishReason::parse);

        ProviderResult {
            text: extracted.text,
            model: config.model.clone(),
            provider: ProviderId::Gemini,
            tokens_used,
            latency: Default::default(),
            finish_reason,
        }
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn generate<'a>(
        &'a self,
        messages: Vec<Message>,
        config: GenerationConfig,
    ) -> ProviderFuture<'a, Result<ProviderResult, ProviderError>> {
        Box::pin(async move {
            let api_key = self.credentials.require_api_key(ProviderId::Gemini)?;
            let request = TransportRequest {
                url: self.endpoint(&config.model),
                auth: TransportAuth::Header {
                    name: API_KEY_HEADER,
                    value: api_key,
                },
                body: Self::build_body(&messages, &config),
            };

            let started = Instant::now();
            let payload = self.transport.post_json(request).await?;
            let mut result = self.convert_response(&payload, &config);
            result.latency = started.elapsed();
            Ok(result)
        })
    }
}
