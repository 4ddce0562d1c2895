//! Conversation storage and chat-turn orchestration over a provider router.

mod error;
mod orchestrator;
mod store;
mod types;
mod validation;

pub mod prelude {
    pub use crate::{
        AggregateUpdate, ChatError, ChatErrorKind, ChatOrchestrator, ChatOrchestratorBuilder,
        ChatRequest, ChatResult, Conversation, ConversationStore, InMemoryConversationStore,
        NewMessage, StoredMessage,
    };
}

pub use error::{ChatError, ChatErrorKind};
pub use orchestrator::{
    AggregateUpdate, ChatOrchestrator, ChatOrchestratorBuilder, DEFAULT_HISTORY_WINDOW,
};
pub use store::{ChatFuture, ConversationStore, InMemoryConversationStore};
pub use types::{ChatRequest, ChatResult, Conversation, NewMessage, StoredMessage};
pub use validation::{
    CONVERSATION_ID_PREFIX, MAX_MESSAGE_CHARS, MESSAGE_ID_PREFIX, new_conversation_id,
    new_message_id, validate_conversation_id, validate_message_content, validate_user_id,
};
