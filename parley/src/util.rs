//! Small convenience constructors for common types.

use crate::{ChatRequest, GenerationConfig, Message, ProviderId, Role};

pub fn system_message(content: impl Into<String>) -> Message {
    Message::new(Role::System, content)
}

pub fn user_message(content: impl Into<String>) -> Message {
    Message::new(Role::User, content)
}

pub fn assistant_message(content: impl Into<String>) -> Message {
    Message::new(Role::Assistant, content)
}

pub fn chat_request(user_id: impl Into<String>, text: impl Into<String>) -> ChatRequest {
    ChatRequest::new(text, user_id)
}

/// Continues an existing conversation.
pub fn follow_up(
    conversation_id: impl Into<String>,
    user_id: impl Into<String>,
    text: impl Into<String>,
) -> ChatRequest {
    ChatRequest::new(text, user_id).with_conversation_id(conversation_id)
}

pub fn generation_config(model: impl Into<String>) -> GenerationConfig {
    GenerationConfig::new(model)
}

pub fn parse_provider_id(value: &str) -> Option<ProviderId> {
    ProviderId::parse(value)
}

#[cfg(test)]
mod tests {
    use crate::{ProviderId, Role};

    use super::{follow_up, parse_provider_id, user_message};

    #[test]
    fn parse_provider_id_supports_aliases() {
        assert_eq!(parse_provider_id("OpenAI"), Some(ProviderId::OpenAi));
        assert_eq!(parse_provider_id("google"), Some(ProviderId::Gemini));
        assert_eq!(parse_provider_id("local"), Some(ProviderId::Local));
        assert_eq!(parse_provider_id("claude"), None);
    }

    #[test]
    fn message_and_request_helpers_apply_expected_defaults() {
        let message = user_message("hello");
        assert_eq!(message.role, Role::User);

        let request = follow_up("conv_0123456789ab", "u1", "and then?");
        assert_eq!(request.conversation_id.as_deref(), Some("conv_0123456789ab"));
        assert_eq!(request.text, "and then?");
        assert!(request.config.is_none());
    }
}
