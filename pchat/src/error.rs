//! Chat-layer errors.
//!
//! Provider failures never reach this layer; the router absorbs them. What
//! remains is bad input, unknown conversations, and store faults.

use std::error::Error;
use std::fmt::{Display, Formatter};

use pcommon::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    Validation,
    NotFound,
    Store,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::NotFound, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Store, message)
    }

    pub fn conversation_not_found(conversation_id: &str) -> Self {
        Self::not_found(format!("conversation '{conversation_id}' not found"))
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<ValidationError> for ChatError {
    fn from(value: ValidationError) -> Self {
        ChatError::validation(value.to_string())
    }
}
