//! Provider-agnostic message and result model types.
//!
//! ```rust
//! use pprovider::{Message, ProviderId, Role};
//!
//! let message = Message::new(Role::User, "Summarize this thread");
//! assert_eq!(message.role.as_str(), "user");
//!
//! assert_eq!(ProviderId::parse("Gemini"), Some(ProviderId::Gemini));
//! assert_eq!(ProviderId::parse("bogus"), None);
//! assert_eq!("assistant".parse::<Role>(), Ok(Role::Assistant));
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use pcommon::ValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "local")]
    Local,
}

impl ProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::Local => "local",
        }
    }

    /// Case-insensitive lookup used for caller-supplied provider names.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" | "open-ai" | "open_ai" => Some(Self::OpenAi),
            "gemini" | "google" => Some(Self::Gemini),
            "local" => Some(Self::Local),
            _ => None,
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(ValidationError::new(
                "role",
                format!("unknown role '{other}', expected user, assistant, or system"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Local,
    Other,
}

impl FinishReason {
    /// Maps backend finish markers (`stop`, `length`, `MAX_TOKENS`, `SAFETY`, ...).
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "stop" | "end_turn" => Self::Stop,
            "length" | "max_tokens" => Self::Length,
            "content_filter" | "safety" | "recitation" => Self::ContentFilter,
            "local" => Self::Local,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResult {
    pub text: String,
    pub model: String,
    pub provider: ProviderId,
    pub tokens_used: u32,
    pub latency: Duration,
    pub finish_reason: FinishReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_display_is_stable() {
        assert_eq!(ProviderId::OpenAi.to_string(), "openai");
        assert_eq!(ProviderId::Gemini.to_string(), "gemini");
        assert_eq!(ProviderId::Local.to_string(), "local");
    }

    #[test]
    fn provider_id_parse_supports_aliases() {
        assert_eq!(ProviderId::parse(" OpenAI "), Some(ProviderId::OpenAi));
        assert_eq!(ProviderId::parse("google"), Some(ProviderId::Gemini));
        assert_eq!(ProviderId::parse("bogus"), None);
        assert_eq!(ProviderId::parse(""), None);
    }

    #[test]
    fn role_from_str_rejects_unknown_roles() {
        assert_eq!("USER".parse::<Role>(), Ok(Role::User));
        assert_eq!("system".parse::<Role>(), Ok(Role::System));

        let err = "tool".parse::<Role>().expect_err("tool is not a chat role");
        assert_eq!(err.field, "role");
    }

    #[test]
    fn finish_reason_parse_maps_backend_markers() {
        assert_eq!(FinishReason::parse("stop"), FinishReason::Stop);
        assert_eq!(FinishReason::parse("MAX_TOKENS"), FinishReason::Length);
        assert_eq!(FinishReason::parse("SAFETY"), FinishReason::ContentFilter);
        assert_eq!(FinishReason::parse("whatever"), FinishReason::Other);
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).expect("serialize message");
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
