//! OpenAI chat-completions adapter.

use std::sync::Arc;
use std::time::Instant;

use pcommon::GenerationConfig;
use serde::Serialize;
use serde_json::Value;

use crate::extract::{ResponseExtractor, estimate_tokens};
use crate::transport::{ProviderTransport, TransportAuth, TransportRequest};
use crate::{
    FinishReason, Message, ProviderAdapter, ProviderError, ProviderFuture, ProviderId,
    ProviderResult, SecureCredentialManager,
};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    stream: bool,
}

#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn ProviderTransport>,
    base_url: String,
    extractor: ResponseExtractor,
}

impl OpenAiAdapter {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn ProviderTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            base_url: OPENAI_BASE_URL.to_string(),
            extractor: ResponseExtractor::openai(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    pub fn build_body(
        messages: &[Message],
        config: &GenerationConfig,
    ) -> Result<Value, ProviderError> {
        let request = ChatCompletionRequest {
            model: &config.model,
            messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            frequency_penalty: config.frequency_penalty,
            presence_penalty: config.presence_penalty,
            stream: false,
        };

        serde_json::to_value(request).map_err(|err| {
            ProviderError::malformed_response(format!("failed to encode OpenAI request: {err}"))
        })
    }

    fn convert_response(&self, payload: &Value, config: &GenerationConfig) -> ProviderResult {
        let extracted = self.extractor.extract(payload);
        let tokens_used = payload
            .get("usage")
            .and_then(|usage| usage.get("total_tokens"))
            .and_then(Value::as_u64)
            .and_then(|tokens| u32::try_from(tokens).ok())
            .unwrap_or_else(|| estimate_tokens(&extracted.text));
        let model = payload
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(config.model.as_str())
            .to_string();
        let finish_reason = payload
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("finish_reason"))
            .and_then(Value::as_str)
            .map_or(FinishReason::Stop, FinishReason::parse);

        ProviderResult {
            text: extracted.text,
            model,
            provider: ProviderId::OpenAi,
            tokens_used,
            latency: Default::default(),
            finish_reason,
        }
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn generate<'a>(
        &'a self,
        messages: Vec<Message>,
        config: GenerationConfig,
    ) -> ProviderFuture<'a, Result<ProviderResult, ProviderError>> {
        Box::pin(async move {
            let api_key = self.credentials.require_api_key(ProviderId::OpenAi)?;
            let request = TransportRequest {
                url: self.endpoint(),
                auth: TransportAuth::Bearer(api_key),
                body: Self::build_body(&messages, &config)?,
            };

            let started = Instant::now();
            let payload = self.transport.post_json(request).await?;
            let mut result = self.convert_response(&payload, &config);
            result.latency = started.elapsed();
            Ok(result)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::ProviderErrorKind;

    #[derive(Debug)]
    struct FakeTransport {
        response: Result<Value, ProviderError>,
        requests: Mutex<Vec<(String, String, Value)>>,
    }

    impl FakeTransport {
        fn new(response: Result<Value, ProviderError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl ProviderTransport for FakeTransport {
        fn post_json<'a>(
            &'a self,
            request: TransportRequest,
        ) -> ProviderFuture<'a, Result<Value, ProviderError>> {
            Box::pin(async move {
                let auth = match &request.auth {
                    TransportAuth::Bearer(key) => format!("bearer {}", key.expose()),
                    TransportAuth::Header { name, value } => format!("{name} {}", value.expose()),
                };
                self.requests
                    .lock()
                    .expect("requests lock")
                    .push((request.url, auth, request.body));
                self.response.clone()
            })
        }
    }

    fn adapter_with(transport: Arc<FakeTransport>) -> OpenAiAdapter {
        let credentials = Arc::new(SecureCredentialManager::new());
        credentials
            .set_openai_api_key("sk-test")
            .expect("key should be accepted");
        OpenAiAdapter::new(credentials, transport).with_base_url("https://proxy.local/v1/")
    }

    #[tokio::test]
    async fn generate_posts_chat_completion_and_reads_usage() {
        let transport = Arc::new(FakeTransport::new(Ok(json!({
            "model": "gpt-3.5-turbo-0125",
            "choices": [{ "message": { "role": "assistant", "content": "Hi there" }, "finish_reason": "stop" }],
            "usage": { "total_tokens": 42 }
        }))));
        let adapter = adapter_with(transport.clone());

        let result = adapter
            .generate(
                vec![Message::system("be brief"), Message::user("hello")],
                GenerationConfig::default().with_max_tokens(256),
            )
            .await
            .expect("generation should succeed");

        assert_eq!(result.text, "Hi there");
        assert_eq!(result.model, "gpt-3.5-turbo-0125");
        assert_eq!(result.provider, ProviderId::OpenAi);
        assert_eq!(result.tokens_used, 42);
        assert_eq!(result.finish_reason, FinishReason::Stop);

        let requests = transport.requests.lock().expect("requests lock");
        let (url, auth, body) = &requests[0];
        assert_eq!(url, "https://proxy.local/v1/chat/completions");
        assert_eq!(auth, "bearer sk-test");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
    }

    #[tokio::test]
    async fn generate_estimates_tokens_when_usage_is_missing() {
        let transport = Arc::new(FakeTransport::new(Ok(json!({
            "choices": [{ "message": { "content": "one two three four five six seven eight nine ten" } }]
        }))));
        let adapter = adapter_with(transport);

        let result = adapter
            .generate(vec![Message::user("count")], GenerationConfig::new("gpt-4o"))
            .await
            .expect("generation should succeed");

        assert_eq!(result.tokens_used, 13);
        assert_eq!(result.model, "gpt-4o");
    }

    #[tokio::test]
    async fn generate_without_credentials_fails_before_transport() {
        let transport = Arc::new(FakeTransport::new(Ok(json!({}))));
        let adapter = OpenAiAdapter::new(Arc::new(SecureCredentialManager::new()), transport.clone());

        let err = adapter
            .generate(vec![Message::user("hello")], GenerationConfig::default())
            .await
            .expect_err("missing key must fail");

        assert_eq!(err.kind, ProviderErrorKind::Authentication);
        assert!(transport.requests.lock().expect("requests lock").is_empty());
    }

    #[tokio::test]
    async fn transport_errors_pass_through_unchanged() {
        let transport = Arc::new(FakeTransport::new(Err(ProviderError::quota("rate limited"))));
        let adapter = adapter_with(transport);

        let err = adapter
            .generate(vec![Message::user("hello")], GenerationConfig::default())
            .await
            .expect_err("quota error should surface");

        assert_eq!(err, ProviderError::quota("rate limited"));
    }
}
