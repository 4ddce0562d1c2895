//! One chat turn: history, routing, persistence, aggregates.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pchat::{ChatOrchestrator, ChatRequest};
//! use pprovider::ProviderRouter;
//!
//! let orchestrator = ChatOrchestrator::builder(Arc::new(ProviderRouter::builder().build()))
//!     .history_window(4)
//!     .system_prompt("You are terse.")
//!     .build();
//!
//! assert_eq!(orchestrator.history_window(), 4);
//! let _request = ChatRequest::new("Hello", "u1").with_provider("gemini");
//! ```

use std::sync::Arc;

use pcommon::GenerationConfig;
use pprovider::{Message, ProviderRouter, RouteRequest};

use crate::validation::{require_non_blank, validate_message_content};
use crate::{
    ChatError, ChatRequest, ChatResult, Conversation, ConversationStore,
    InMemoryConversationStore, NewMessage, StoredMessage,
};

pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Each turn stores the user message and the assistant reply.
const MESSAGES_PER_TURN: usize = 2;

/// When conversation aggregates are written relative to returning the result.
///
/// With `Deferred`, a caller that reads the conversation right after a turn
/// may still see the previous `updated_at` and `message_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregateUpdate {
    /// Spawned on the ambient tokio runtime; applied inline when there is none.
    #[default]
    Deferred,
    Inline,
}

pub struct ChatOrchestratorBuilder {
    router: Arc<ProviderRouter>,
    store: Option<Arc<dyn ConversationStore>>,
    system_prompt: Option<String>,
    history_window: usize,
    aggregate_update: AggregateUpdate,
}

impl ChatOrchestratorBuilder {
    pub fn new(router: Arc<ProviderRouter>) -> Self {
        Self {
            router,
            store: None,
            system_prompt: None,
            history_window: DEFAULT_HISTORY_WINDOW,
            aggregate_update: AggregateUpdate::default(),
        }
    }

    pub fn store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Blank prompts are ignored.
    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        self.system_prompt = (!system_prompt.trim().is_empty()).then_some(system_prompt);
        self
    }

    pub fn history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    pub fn aggregate_update(mut self, aggregate_update: AggregateUpdate) -> Self {
        self.aggregate_update = aggregate_update;
        self
    }

    pub fn build(self) -> ChatOrchestrator {
        ChatOrchestrator {
            router: self.router,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryConversationStore::new())),
            system_prompt: self.system_prompt,
            history_window: self.history_window,
            aggregate_update: self.aggregate_update,
        }
    }
}

#[derive(Clone)]
pub struct ChatOrchestrator {
    router: Arc<ProviderRouter>,
    store: Arc<dyn ConversationStore>,
    system_prompt: Option<String>,
    history_window: usize,
    aggregate_update: AggregateUpdate,
}

impl ChatOrchestrator {
    pub fn new(router: Arc<ProviderRouter>, store: Arc<dyn ConversationStore>) -> Self {
        Self::builder(router).store(store).build()
    }

    pub fn builder(router: Arc<ProviderRouter>) -> ChatOrchestratorBuilder {
        ChatOrchestratorBuilder::new(router)
    }

    pub fn router(&self) -> &Arc<ProviderRouter> {
        &self.router
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn aggregate_update(&self) -> AggregateUpdate {
        self.aggregate_update
    }

    /// Answers one message. Provider failures never surface here; only bad
    /// input, unknown conversations, and store faults do.
    pub async fn process_message(&self, request: ChatRequest) -> Result<ChatResult, ChatError> {
        let ChatRequest {
            text,
            user_id,
            conversation_id,
            provider,
            model,
            config,
        } = request;

        validate_message_content(&text)?;
        require_non_blank("user_id", &user_id)?;
        let config = self.resolve_config(config, model)?;

        let conversation_id = match conversation_id {
            Some(conversation_id) => self.store.get(&conversation_id).await?.id,
            None => self.create_conversation(&user_id, None).await?.id,
        };

        let history = self
            .store
            .recent_messages(&conversation_id, self.history_window)
            .await?;
        let context = self.build_context(&history, &text);

        let result = self
            .router
            .route(RouteRequest {
                messages: context,
                provider,
                config,
            })
            .await;

        self.store
            .append(&conversation_id, NewMessage::user(text))
            .await?;
        let assistant = self
            .store
            .append(
                &conversation_id,
                NewMessage::assistant(result.text.clone())
                    .with_tokens_used(result.tokens_used)
                    .with_model_used(result.model.clone()),
            )
            .await?;

        tracing::info!(
            phase = "chat",
            event = "turn_processed",
            conversation_id = %conversation_id,
            provider = %result.provider,
            model = %result.model,
            processing_ms = result.latency.as_millis() as u64
        );

        let chat_result = ChatResult {
            message: result.text,
            conversation_id: conversation_id.clone(),
            message_id: assistant.id,
            timestamp: assistant.timestamp,
            model_used: result.model,
            provider_used: result.provider,
            tokens_used: result.tokens_used,
            processing_time: result.latency,
        };

        self.update_aggregates(conversation_id).await?;
        Ok(chat_result)
    }

    pub async fn create_conversation(
        &self,
        user_id: &str,
        title: Option<String>,
    ) -> Result<Conversation, ChatError> {
        let conversation = self.store.create(user_id, title).await?;
        tracing::info!(
            phase = "chat",
            event = "conversation_created",
            conversation_id = %conversation.id,
            user_id
        );
        Ok(conversation)
    }

    pub async fn conversation(&self, conversation_id: &str) -> Result<Conversation, ChatError> {
        self.store.get(conversation_id).await
    }

    pub async fn history(
        &self,
        conversation_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<StoredMessage>, ChatError> {
        self.store.list_messages(conversation_id, limit, offset).await
    }

    pub async fn conversations(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Conversation>, ChatError> {
        self.store.list_conversations(user_id, limit, offset).await
    }

    pub async fn delete_conversation(&self, conversation_id: &str) -> Result<bool, ChatError> {
        self.store.delete(conversation_id).await
    }

    fn resolve_config(
        &self,
        config: Option<GenerationConfig>,
        model: Option<String>,
    ) -> Result<Option<GenerationConfig>, ChatError> {
        let model = model.filter(|model| !model.trim().is_empty());
        let config = match (config, model) {
            (Some(config), Some(model)) => Some(config.with_model(model)),
            (Some(config), None) => Some(config),
            (None, Some(model)) => Some(self.router.defaults().config_with_model(model)),
            (None, None) => None,
        };

        if let Some(config) = &config {
            config.validate()?;
        }

        Ok(config)
    }

    fn build_context(&self, history: &[StoredMessage], text: &str) -> Vec<Message> {
        let mut context = Vec::with_capacity(history.len() + 2);
        if let Some(system_prompt) = &self.system_prompt {
            context.push(Message::system(system_prompt.clone()));
        }
        context.extend(history.iter().map(StoredMessage::to_message));
        context.push(Message::user(text));
        context
    }

    async fn update_aggregates(&self, conversation_id: String) -> Result<(), ChatError> {
        if self.aggregate_update == AggregateUpdate::Deferred {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let store = Arc::clone(&self.store);
                handle.spawn(async move {
                    match store.record_turn(&conversation_id, MESSAGES_PER_TURN).await {
                        Ok(()) => tracing::debug!(
                            phase = "chat",
                            event = "aggregates_applied",
                            conversation_id = %conversation_id
                        ),
                        Err(error) => tracing::warn!(
                            phase = "chat",
                            event = "aggregates_failed",
                            conversation_id = %conversation_id,
                            error = %error
                        ),
                    }
                });
                return Ok(());
            }
        }

        self.store
            .record_turn(&conversation_id, MESSAGES_PER_TURN)
            .await
    }
}

impl std::fmt::Debug for ChatOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatOrchestrator")
            .field("router", &self.router)
            .field("system_prompt", &self.system_prompt)
            .field("history_window", &self.history_window)
            .field("aggregate_update", &self.aggregate_update)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use pprovider::{
        FinishReason, ProviderAdapter, ProviderError, ProviderFuture, ProviderId, ProviderResult,
        Role,
    };

    use super::*;
    use crate::ChatErrorKind;

    #[derive(Default)]
    struct CapturingAdapter {
        calls: Mutex<Vec<(Vec<Message>, GenerationConfig)>>,
    }

    impl ProviderAdapter for CapturingAdapter {
        fn id(&self) -> ProviderId {
            ProviderId::OpenAi
        }

        fn generate<'a>(
            &'a self,
            messages: Vec<Message>,
            config: GenerationConfig,
        ) -> ProviderFuture<'a, Result<ProviderResult, ProviderError>> {
            Box::pin(async move {
                let model = config.model.clone();
                self.calls
                    .lock()
                    .expect("calls lock")
                    .push((messages, config));
                Ok(ProviderResult {
                    text: "captured".to_string(),
                    model,
                    provider: ProviderId::OpenAi,
                    tokens_used: 7,
                    latency: Duration::from_millis(30),
                    finish_reason: FinishReason::Stop,
                })
            })
        }
    }

    fn orchestrator_with(adapter: Arc<CapturingAdapter>) -> ChatOrchestrator {
        let router = ProviderRouter::builder().register_arc(adapter).build();
        ChatOrchestrator::builder(Arc::new(router))
            .aggregate_update(AggregateUpdate::Inline)
            .build()
    }

    #[tokio::test]
    async fn context_includes_system_prompt_and_bounded_history() {
        let adapter = Arc::new(CapturingAdapter::default());
        let router = ProviderRouter::builder().register_arc(adapter.clone()).build();
        let orchestrator = ChatOrchestrator::builder(Arc::new(router))
            .system_prompt("Be helpful.")
            .history_window(2)
            .aggregate_update(AggregateUpdate::Inline)
            .build();

        let first = orchestrator
            .process_message(ChatRequest::new("one", "u1"))
            .await
            .expect("first turn");
        orchestrator
            .process_message(ChatRequest::new("two", "u1").with_conversation_id(&first.conversation_id))
            .await
            .expect("second turn");

        let calls = adapter.calls.lock().expect("calls lock");
        let (messages, _) = &calls[1];
        let shape = messages
            .iter()
            .map(|message| (message.role, message.content.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            shape,
            vec![
                (Role::System, "Be helpful."),
                (Role::User, "one"),
                (Role::Assistant, "captured"),
                (Role::User, "two"),
            ]
        );
    }

    #[tokio::test]
    async fn model_without_config_uses_router_defaults() {
        let adapter = Arc::new(CapturingAdapter::default());
        let orchestrator = orchestrator_with(adapter.clone());

        let result = orchestrator
            .process_message(ChatRequest::new("hi", "u1").with_model("gpt-4o"))
            .await
            .expect("turn should succeed");

        assert_eq!(result.model_used, "gpt-4o");
        let calls = adapter.calls.lock().expect("calls lock");
        let config = &calls[0].1;
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.temperature, 0.7);
    }

    #[tokio::test]
    async fn model_overrides_supplied_config_model() {
        let adapter = Arc::new(CapturingAdapter::default());
        let orchestrator = orchestrator_with(adapter.clone());

        orchestrator
            .process_message(
                ChatRequest::new("hi", "u1")
                    .with_config(GenerationConfig::new("gpt-3.5-turbo").with_max_tokens(50))
                    .with_model("gpt-4o-mini"),
            )
            .await
            .expect("turn should succeed");

        let calls = adapter.calls.lock().expect("calls lock");
        assert_eq!(calls[0].1.model, "gpt-4o-mini");
        assert_eq!(calls[0].1.max_tokens, 50);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_any_provider_call() {
        let adapter = Arc::new(CapturingAdapter::default());
        let orchestrator = orchestrator_with(adapter.clone());

        let cases = [
            ChatRequest::new("   ", "u1"),
            ChatRequest::new("x".repeat(4001), "u1"),
            ChatRequest::new("hi", ""),
            ChatRequest::new("hi", "u1").with_conversation_id("bad-id"),
            ChatRequest::new("hi", "u1").with_config(GenerationConfig::default().with_temperature(3.0)),
        ];

        for request in cases {
            let err = orchestrator
                .process_message(request)
                .await
                .expect_err("request should be rejected");
            assert_eq!(err.kind, ChatErrorKind::Validation);
        }

        let missing = orchestrator
            .process_message(ChatRequest::new("hi", "u1").with_conversation_id("conv_0123456789ab"))
            .await
            .expect_err("unknown conversation");
        assert_eq!(missing.kind, ChatErrorKind::NotFound);

        assert!(adapter.calls.lock().expect("calls lock").is_empty());
        assert!(orchestrator
            .conversations("u1", 10, 0)
            .await
            .expect("list")
            .is_empty());
    }

    #[tokio::test]
    async fn inline_aggregates_are_visible_immediately() {
        let orchestrator = orchestrator_with(Arc::new(CapturingAdapter::default()));

        let result = orchestrator
            .process_message(ChatRequest::new("hi", "u1"))
            .await
            .expect("turn should succeed");

        let conversation = orchestrator
            .conversation(&result.conversation_id)
            .await
            .expect("conversation exists");
        assert_eq!(conversation.message_count, 2);
        assert_eq!(result.tokens_used, 7);
        assert_eq!(result.processing_time, Duration::from_millis(30));
    }

    #[test]
    fn deferred_update_without_runtime_applies_inline() {
        let orchestrator = ChatOrchestrator::builder(Arc::new(ProviderRouter::builder().build())).build();
        assert_eq!(orchestrator.aggregate_update(), AggregateUpdate::Deferred);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime should build");
        let conversation = runtime
            .block_on(orchestrator.create_conversation("u1", None))
            .expect("create");

        let future = orchestrator.update_aggregates(conversation.id.clone());
        drive(future).expect("inline update");

        let refreshed = runtime
            .block_on(orchestrator.conversation(&conversation.id))
            .expect("conversation");
        assert_eq!(refreshed.message_count, 2);
    }

    // Polls a future that never suspends, outside any tokio context.
    fn drive<F: std::future::Future>(future: F) -> F::Output {
        use std::task::{Context, Poll, Waker};

        let mut future = std::pin::pin!(future);
        let mut cx = Context::from_waker(Waker::noop());
        loop {
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return output;
            }
        }
    }
}
