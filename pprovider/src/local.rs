//! Dependency-free responder used whenever no backend can answer.
//!
//! ```rust
//! use pprovider::{LocalFallbackResponder, Message, ProviderId};
//!
//! let reply = LocalFallbackResponder::new().respond(&[Message::user("ping")]);
//! assert_eq!(reply.provider, ProviderId::Local);
//! assert_eq!(reply.text, "(Local) I received: 'ping'. This is a local fallback response.");
//! ```

use std::time::Instant;

use crate::extract::word_count;
use crate::{FinishReason, Message, ProviderId, ProviderResult, Role};

pub const LOCAL_MODEL: &str = "local-fallback";

pub const LOCAL_GREETING: &str = "Hello! I'm running in local fallback mode. How can I help you?";

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFallbackResponder;

impl LocalFallbackResponder {
    pub fn new() -> Self {
        Self
    }

    /// Echoes the most recent user message, or greets when there is none or it is empty.
    pub fn respond(&self, messages: &[Message]) -> ProviderResult {
        let started = Instant::now();
        let text = match messages
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
        {
            Some(message) if !message.content.is_empty() => format!(
                "(Local) I received: '{}'. This is a local fallback response.",
                message.content
            ),
            _ => LOCAL_GREETING.to_string(),
        };

        ProviderResult {
            tokens_used: word_count(&text),
            text,
            model: LOCAL_MODEL.to_string(),
            provider: ProviderId::Local,
            latency: started.elapsed(),
            finish_reason: FinishReason::Local,
        }
    }
}
