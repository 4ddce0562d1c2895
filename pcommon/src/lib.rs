//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use pcommon::{GenerationConfig, ValidationError};
//!
//! let config = GenerationConfig::new("gemini-2.5-flash").with_temperature(0.3);
//! assert!(config.validate().is_ok());
//!
//! let err: ValidationError = config.with_max_tokens(0).validate().unwrap_err();
//! assert_eq!(err.field, "max_tokens");
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use pcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod validation {
    //! Input validation failures shared by the provider and chat layers.
    //!
    //! ```rust
    //! use pcommon::ValidationError;
    //!
    //! let err = ValidationError::new("user_id", "must not be empty");
    //! assert_eq!(err.to_string(), "invalid user_id: must not be empty");
    //! ```

    use std::error::Error;
    use std::fmt::{Display, Formatter};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ValidationError {
        pub field: String,
        pub message: String,
    }

    impl ValidationError {
        pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
            Self {
                field: field.into(),
                message: message.into(),
            }
        }
    }

    impl Display for ValidationError {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "invalid {}: {}", self.field, self.message)
        }
    }

    impl Error for ValidationError {}
}

pub mod model {
    //! Generation parameters passed from callers down to provider adapters.
    //!
    //! ```rust
    //! use pcommon::GenerationConfig;
    //!
    //! let config = GenerationConfig::new("gpt-3.5-turbo")
    //!     .with_temperature(0.2)
    //!     .with_max_tokens(128)
    //!     .with_top_p(0.9);
    //!
    //! assert_eq!(config.temperature, 0.2);
    //! assert_eq!(config.max_tokens, 128);
    //! assert!(config.validate().is_ok());
    //! ```

    use serde::{Deserialize, Serialize};

    use crate::ValidationError;

    pub const MAX_TOKENS_LIMIT: u32 = 4000;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct GenerationConfig {
        pub model: String,
        pub temperature: f32,
        pub max_tokens: u32,
        pub top_p: f32,
        pub frequency_penalty: f32,
        pub presence_penalty: f32,
    }

    impl Default for GenerationConfig {
        fn default() -> Self {
            Self {
                model: "gpt-3.5-turbo".to_string(),
                temperature: 0.7,
                max_tokens: 1000,
                top_p: 1.0,
                frequency_penalty: 0.0,
                presence_penalty: 0.0,
            }
        }
    }

    impl GenerationConfig {
        pub fn new(model: impl Into<String>) -> Self {
            Self {
                model: model.into(),
                ..Self::default()
            }
        }

        pub fn with_model(mut self, model: impl Into<String>) -> Self {
            self.model = model.into();
            self
        }

        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = temperature;
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = max_tokens;
            self
        }

        pub fn with_top_p(mut self, top_p: f32) -> Self {
            self.top_p = top_p;
            self
        }

        pub fn with_frequency_penalty(mut self, penalty: f32) -> Self {
            self.frequency_penalty = penalty;
            self
        }

        pub fn with_presence_penalty(mut self, penalty: f32) -> Self {
            self.presence_penalty = penalty;
            self
        }

        pub fn validate(&self) -> Result<(), ValidationError> {
            if self.model.trim().is_empty() {
                return Err(ValidationError::new("model", "must not be empty"));
            }

            if !(0.0..=2.0).contains(&self.temperature) {
                return Err(ValidationError::new(
                    "temperature",
                    "must be in the inclusive range 0.0..=2.0",
                ));
            }

            if !(1..=MAX_TOKENS_LIMIT).contains(&self.max_tokens) {
                return Err(ValidationError::new(
                    "max_tokens",
                    format!("must be in the inclusive range 1..={MAX_TOKENS_LIMIT}"),
                ));
            }

            if !(0.0..=1.0).contains(&self.top_p) {
                return Err(ValidationError::new(
                    "top_p",
                    "must be in the inclusive range 0.0..=1.0",
                ));
            }

            for (field, value) in [
                ("frequency_penalty", self.frequency_penalty),
                ("presence_penalty", self.presence_penalty),
            ] {
                if !(-2.0..=2.0).contains(&value) {
                    return Err(ValidationError::new(
                        field,
                        "must be in the inclusive range -2.0..=2.0",
                    ));
                }
            }

            Ok(())
        }
    }
}

pub use future::BoxFuture;
pub use model::{GenerationConfig, MAX_TOKENS_LIMIT};
pub use validation::ValidationError;
