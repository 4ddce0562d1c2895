//! Common imports for most Parley applications.

pub use crate::{
    assistant_message, chat_request, follow_up, generation_config, parse_provider_id,
    system_message, user_message,
};
pub use crate::{
    build_adapter, build_orchestrator, build_orchestrator_with_store, build_router,
    build_router_with_hooks, init_tracing,
};
pub use crate::{parley_messages, parley_msg, parley_request};
pub use crate::{
    BoxFuture, ChatError, ChatErrorKind, ChatOrchestrator, ChatRequest, ChatResult, ConfigError,
    Conversation, ConversationStore, GenerationConfig, InMemoryConversationStore, Message,
    ParleyConfig, ProviderAdapter, ProviderError, ProviderId, ProviderResult, ProviderRouter,
    Role, RoutingHooks, StoredMessage,
};
