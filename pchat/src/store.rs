//! Conversation storage contract and the default in-memory implementation.
//!
//! `append` only writes the message. Conversation aggregates (`updated_at`,
//! `message_count`) move through `record_turn`, which the orchestrator applies
//! as a separate step after answering.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use pcommon::BoxFuture;

use crate::validation::{
    new_conversation_id, new_message_id, require_non_blank, validate_conversation_id,
};
use crate::{ChatError, Conversation, NewMessage, StoredMessage};

pub type ChatFuture<'a, T> = BoxFuture<'a, T>;

pub trait ConversationStore: Send + Sync {
    fn create<'a>(
        &'a self,
        user_id: &'a str,
        title: Option<String>,
    ) -> ChatFuture<'a, Result<Conversation, ChatError>>;

    fn get<'a>(&'a self, conversation_id: &'a str)
    -> ChatFuture<'a, Result<Conversation, ChatError>>;

    fn append<'a>(
        &'a self,
        conversation_id: &'a str,
        message: NewMessage,
    ) -> ChatFuture<'a, Result<StoredMessage, ChatError>>;

    /// `messages[offset..offset + limit]`, clamped; unknown ids give an empty list.
    fn list_messages<'a>(
        &'a self,
        conversation_id: &'a str,
        limit: usize,
        offset: usize,
    ) -> ChatFuture<'a, Result<Vec<StoredMessage>, ChatError>>;

    /// The last `limit` messages, oldest first.
    fn recent_messages<'a>(
        &'a self,
        conversation_id: &'a str,
        limit: usize,
    ) -> ChatFuture<'a, Result<Vec<StoredMessage>, ChatError>>;

    /// Newest activity first.
    fn list_conversations<'a>(
        &'a self,
        user_id: &'a str,
        limit: usize,
        offset: usize,
    ) -> ChatFuture<'a, Result<Vec<Conversation>, ChatError>>;

    fn record_turn<'a>(
        &'a self,
        conversation_id: &'a str,
        added: usize,
    ) -> ChatFuture<'a, Result<(), ChatError>>;

    /// Removes the conversation and its messages; returns whether anything was removed.
    fn delete<'a>(&'a self, conversation_id: &'a str) -> ChatFuture<'a, Result<bool, ChatError>>;
}

#[derive(Debug)]
struct ConversationRecord {
    conversation: Conversation,
    messages: Vec<StoredMessage>,
}

#[derive(Debug, Default)]
struct StoreState {
    conversations: HashMap<String, ConversationRecord>,
    message_ids: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    state: Mutex<StoreState>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>, ChatError> {
        self.state
            .lock()
            .map_err(|_| ChatError::store("conversation store lock poisoned"))
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn create<'a>(
        &'a self,
        user_id: &'a str,
        title: Option<String>,
    ) -> ChatFuture<'a, Result<Conversation, ChatError>> {
        Box::pin(async move {
            require_non_blank("user_id", user_id)?;

            let now = Utc::now();
            let title = title
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| Conversation::default_title(now));

            let mut state = self.state()?;
            let mut id = new_conversation_id();
            while state.conversations.contains_key(&id) {
                id = new_conversation_id();
            }

            let conversation = Conversation {
                id: id.clone(),
                user_id: user_id.to_string(),
                title,
                created_at: now,
                updated_at: now,
                message_count: 0,
            };
            state.conversations.insert(
                id,
                ConversationRecord {
                    conversation: conversation.clone(),
                    messages: Vec::new(),
                },
            );

            Ok(conversation)
        })
    }

    fn get<'a>(
        &'a self,
        conversation_id: &'a str,
    ) -> ChatFuture<'a, Result<Conversation, ChatError>> {
        Box::pin(async move {
            validate_conversation_id(conversation_id)?;

            self.state()?
                .conversations
                .get(conversation_id)
                .map(|record| record.conversation.clone())
                .ok_or_else(|| ChatError::conversation_not_found(conversation_id))
        })
    }

    fn append<'a>(
        &'a self,
        conversation_id: &'a str,
        message: NewMessage,
    ) -> ChatFuture<'a, Result<StoredMessage, ChatError>> {
        Box::pin(async move {
            validate_conversation_id(conversation_id)?;
            require_non_blank("content", &message.content)?;

            let mut state = self.state()?;
            if !state.conversations.contains_key(conversation_id) {
                return Err(ChatError::conversation_not_found(conversation_id));
            }

            let mut id = new_message_id();
            while state.message_ids.contains(&id) {
                id = new_message_id();
            }
            state.message_ids.insert(id.clone());

            let stored = StoredMessage {
                id,
                conversation_id: conversation_id.to_string(),
                role: message.role,
                content: message.content,
                timestamp: Utc::now(),
                tokens_used: message.tokens_used,
                model_used: message.model_used,
            };

            if let Some(record) = state.conversations.get_mut(conversation_id) {
                record.messages.push(stored.clone());
            }

            Ok(stored)
        })
    }

    fn list_messages<'a>(
        &'a self,
        conversation_id: &'a str,
        limit: usize,
        offset: usize,
    ) -> ChatFuture<'a, Result<Vec<StoredMessage>, ChatError>> {
        Box::pin(async move {
            validate_conversation_id(conversation_id)?;

            let state = self.state()?;
            Ok(state
                .conversations
                .get(conversation_id)
                .map(|record| {
                    record
                        .messages
                        .iter()
                        .skip(offset)
                        .take(limit)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        })
    }

    fn recent_messages<'a>(
        &'a self,
        conversation_id: &'a str,
        limit: usize,
    ) -> ChatFuture<'a, Result<Vec<StoredMessage>, ChatError>> {
        Box::pin(async move {
            validate_conversation_id(conversation_id)?;

            let state = self.state()?;
            Ok(state
                .conversations
                .get(conversation_id)
                .map(|record| {
                    let start = record.messages.len().saturating_sub(limit);
                    record.messages[start..].to_vec()
                })
                .unwrap_or_default())
        })
    }

    fn list_conversations<'a>(
        &'a self,
        user_id: &'a str,
        limit: usize,
        offset: usize,
    ) -> ChatFuture<'a, Result<Vec<Conversation>, ChatError>> {
        Box::pin(async move {
            let state = self.state()?;
            let mut conversations = state
                .conversations
                .values()
                .filter(|record| record.conversation.user_id == user_id)
                .map(|record| record.conversation.clone())
                .collect::<Vec<_>>();
            drop(state);

            conversations.sort_by(|left, right| {
                right
                    .updated_at
                    .cmp(&left.updated_at)
                    .then_with(|| right.created_at.cmp(&left.created_at))
            });

            Ok(conversations.into_iter().skip(offset).take(limit).collect())
        })
    }

    fn record_turn<'a>(
        &'a self,
        conversation_id: &'a str,
        added: usize,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            validate_conversation_id(conversation_id)?;

            let mut state = self.state()?;
            if let Some(record) = state.conversations.get_mut(conversation_id) {
                record.conversation.updated_at = Utc::now();
                record.conversation.message_count += added;
            }

            Ok(())
        })
    }

    fn delete<'a>(&'a self, conversation_id: &'a str) -> ChatFuture<'a, Result<bool, ChatError>> {
        Box::pin(async move {
            validate_conversation_id(conversation_id)?;

            let mut state = self.state()?;
            let Some(record) = state.conversations.remove(conversation_id) else {
                return Ok(false);
            };

            for message in &record.messages {
                state.message_ids.remove(&message.id);
            }

            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use pprovider::Role;

    use super::*;
    use crate::ChatErrorKind;

    #[tokio::test]
    async fn create_assigns_id_and_default_title() {
        let store = InMemoryConversationStore::new();
        let conversation = store.create("u1", None).await.expect("create should succeed");

        assert!(validate_conversation_id(&conversation.id).is_ok());
        assert_eq!(conversation.message_count, 0);
        assert!(conversation.title.starts_with("Conversation "));
        assert_eq!(conversation.created_at, conversation.updated_at);

        let titled = store
            .create("u1", Some("Trip planning".to_string()))
            .await
            .expect("create should succeed");
        assert_eq!(titled.title, "Trip planning");
        assert_ne!(titled.id, conversation.id);
    }

    #[tokio::test]
    async fn create_rejects_blank_user() {
        let store = InMemoryConversationStore::new();
        let err = store.create("  ", None).await.expect_err("blank user id");
        assert_eq!(err.kind, ChatErrorKind::Validation);
    }

    #[tokio::test]
    async fn append_round_trips_role_and_content() {
        let store = InMemoryConversationStore::new();
        let conversation = store.create("u1", None).await.expect("create");

        let stored = store
            .append(
                &conversation.id,
                NewMessage::assistant("Hi!").with_tokens_used(2).with_model_used("m"),
            )
            .await
            .expect("append should succeed");
        assert!(stored.id.starts_with("msg_"));

        let messages = store
            .list_messages(&conversation.id, 10, 0)
            .await
            .expect("list should succeed");
        assert_eq!(messages, vec![stored]);
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(messages[0].content, "Hi!");
        assert_eq!(messages[0].tokens_used, Some(2));
    }

    #[tokio::test]
    async fn append_validates_id_existence_and_content() {
        let store = InMemoryConversationStore::new();

        let malformed = store
            .append("not-an-id", NewMessage::user("hi"))
            .await
            .expect_err("malformed id");
        assert_eq!(malformed.kind, ChatErrorKind::Validation);

        let missing = store
            .append("conv_000000000000", NewMessage::user("hi"))
            .await
            .expect_err("unknown conversation");
        assert_eq!(missing.kind, ChatErrorKind::NotFound);

        let conversation = store.create("u1", None).await.expect("create");
        let empty = store
            .append(&conversation.id, NewMessage::user(""))
            .await
            .expect_err("empty content");
        assert_eq!(empty.kind, ChatErrorKind::Validation);
    }

    #[tokio::test]
    async fn recent_messages_returns_tail_in_order() {
        let store = InMemoryConversationStore::new();
        let conversation = store.create("u1", None).await.expect("create");
        for index in 0..5 {
            store
                .append(&conversation.id, NewMessage::user(format!("m{index}")))
                .await
                .expect("append");
        }

        let recent = store
            .recent_messages(&conversation.id, 3)
            .await
            .expect("recent");
        let contents = recent.iter().map(|m| m.content.as_str()).collect::<Vec<_>>();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);

        let all = store
            .recent_messages(&conversation.id, 50)
            .await
            .expect("recent");
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn get_and_list_on_unknown_ids() {
        let store = InMemoryConversationStore::new();

        let err = store.get("conv_abcdefabcdef").await.expect_err("unknown id");
        assert_eq!(err.kind, ChatErrorKind::NotFound);

        let messages = store
            .list_messages("conv_abcdefabcdef", 10, 0)
            .await
            .expect("unknown ids list as empty");
        assert!(messages.is_empty());

        assert!(!store.delete("conv_abcdefabcdef").await.expect("delete is a no-op"));
        store
            .record_turn("conv_abcdefabcdef", 2)
            .await
            .expect("record_turn is a no-op");
    }

    #[tokio::test]
    async fn record_turn_bumps_aggregates_and_reorders_listing() {
        let store = InMemoryConversationStore::new();
        let older = store.create("u1", Some("older".into())).await.expect("create");
        let newer = store.create("u1", Some("newer".into())).await.expect("create");
        store.create("u2", None).await.expect("create");

        std::thread::sleep(std::time::Duration::from_millis(2));
        store.record_turn(&older.id, 2).await.expect("record turn");

        let listed = store
            .list_conversations("u1", 10, 0)
            .await
            .expect("list conversations");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, older.id);
        assert_eq!(listed[0].message_count, 2);
        assert!(listed[0].updated_at >= newer.updated_at);

        let paged = store
            .list_conversations("u1", 1, 1)
            .await
            .expect("list conversations");
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].id, newer.id);
    }

    #[tokio::test]
    async fn delete_cascades_to_messages() {
        let store = InMemoryConversationStore::new();
        let conversation = store.create("u1", None).await.expect("create");
        store
            .append(&conversation.id, NewMessage::user("hello"))
            .await
            .expect("append");

        assert!(store.delete(&conversation.id).await.expect("delete"));
        assert!(store
            .list_messages(&conversation.id, 10, 0)
            .await
            .expect("list")
            .is_empty());
        assert!(store
            .list_conversations("u1", 10, 0)
            .await
            .expect("list")
            .is_empty());
        assert!(store.state().expect("state").message_ids.is_empty());
    }
}
