//! Identifier generation and input checks for the chat layer.
//!
//! ```rust
//! use pchat::{new_conversation_id, validate_conversation_id, validate_user_id};
//!
//! let id = new_conversation_id();
//! assert!(validate_conversation_id(&id).is_ok());
//! assert!(validate_conversation_id("conv_XYZ").is_err());
//! assert!(validate_user_id("alice_01").is_ok());
//! ```

use pcommon::ValidationError;
use uuid::Uuid;

pub const CONVERSATION_ID_PREFIX: &str = "conv_";
pub const MESSAGE_ID_PREFIX: &str = "msg_";
pub const MAX_MESSAGE_CHARS: usize = 4000;

const ID_HEX_LEN: usize = 12;

pub fn new_conversation_id() -> String {
    prefixed_id(CONVERSATION_ID_PREFIX)
}

pub fn new_message_id() -> String {
    prefixed_id(MESSAGE_ID_PREFIX)
}

fn prefixed_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", &hex[..ID_HEX_LEN])
}

/// Conversation ids look like `conv_` followed by 12 lowercase hex digits.
pub fn validate_conversation_id(conversation_id: &str) -> Result<(), ValidationError> {
    let well_formed = conversation_id
        .strip_prefix(CONVERSATION_ID_PREFIX)
        .is_some_and(|hex| {
            hex.len() == ID_HEX_LEN
                && hex
                    .bytes()
                    .all(|byte| matches!(byte, b'0'..=b'9' | b'a'..=b'f'))
        });

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new(
            "conversation_id",
            format!("'{conversation_id}' is not a valid conversation id"),
        ))
    }
}

/// Strict account-style user id: 3 to 50 characters of `[A-Za-z0-9_-]`.
pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    let length = user_id.chars().count();
    if !(3..=50).contains(&length) {
        return Err(ValidationError::new(
            "user_id",
            "must be between 3 and 50 characters",
        ));
    }

    if !user_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ValidationError::new(
            "user_id",
            "may only contain letters, digits, '_' and '-'",
        ));
    }

    Ok(())
}

pub fn validate_message_content(content: &str) -> Result<(), ValidationError> {
    require_non_blank("message", content)?;

    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ValidationError::new(
            "message",
            format!("must be at most {MAX_MESSAGE_CHARS} characters"),
        ));
    }

    Ok(())
}

pub fn require_non_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, "must not be empty"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_expected_shape() {
        let conversation = new_conversation_id();
        assert_eq!(conversation.len(), CONVERSATION_ID_PREFIX.len() + ID_HEX_LEN);
        validate_conversation_id(&conversation).expect("generated id should validate");

        let message = new_message_id();
        assert!(message.starts_with("msg_"));
        assert_eq!(message.len(), 16);
        assert_ne!(new_message_id(), message);
    }

    #[test]
    fn conversation_id_rejects_wrong_prefix_case_and_length() {
        for bad in [
            "",
            "conv_",
            "conv_0123456789ab0",
            "conv_0123456789AB",
            "chat_0123456789ab",
            "conv_0123456789ag",
        ] {
            let err = validate_conversation_id(bad).expect_err("id should be rejected");
            assert_eq!(err.field, "conversation_id");
        }
        assert!(validate_conversation_id("conv_0123456789ab").is_ok());
    }

    #[test]
    fn user_id_rules() {
        assert!(validate_user_id("bob").is_ok());
        assert!(validate_user_id("user-name_42").is_ok());
        assert!(validate_user_id("u1").is_err());
        assert!(validate_user_id("has space").is_err());
        assert!(validate_user_id(&"a".repeat(51)).is_err());
    }

    #[test]
    fn message_content_limits() {
        assert!(validate_message_content("hello").is_ok());
        assert!(validate_message_content(" \n\t").is_err());
        assert!(validate_message_content(&"é".repeat(MAX_MESSAGE_CHARS)).is_ok());

        let err = validate_message_content(&"x".repeat(MAX_MESSAGE_CHARS + 1))
            .expect_err("oversized content should be rejected");
        assert_eq!(err.field, "message");
    }
}
