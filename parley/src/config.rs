//! Process configuration: provider credentials, models, and generation defaults.
//!
//! Values come from TOML or from environment variables; anything unset keeps
//! its default.
//!
//! ```rust
//! use parley::ParleyConfig;
//!
//! let config = ParleyConfig::from_toml_str(
//!     r#"
//!     default_provider = "openai"
//!     openai_api_key = "sk-example"
//!     temperature = 0.2
//!     "#,
//! )
//! .expect("config should parse");
//!
//! assert_eq!(config.default_provider, "openai");
//! assert_eq!(config.max_tokens, 4000);
//! assert!(!format!("{config:?}").contains("sk-example"));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use pcommon::MAX_TOKENS_LIMIT;
use pprovider::{ProviderDefaults, ProviderError, ProviderId};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Io,
    Parse,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Io, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Parse, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Invalid, message)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConfigError {}

impl From<ProviderError> for ConfigError {
    fn from(error: ProviderError) -> Self {
        Self::invalid(error.message)
    }
}

#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,
    pub default_provider: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub history_window: usize,
    pub system_prompt: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: String,
}

impl Default for ParleyConfig {
    fn default() -> Self {
        let defaults = ProviderDefaults::default();
        Self {
            openai_api_key: None,
            openai_model: defaults.openai_model,
            openai_base_url: None,
            gemini_api_key: None,
            gemini_model: defaults.gemini_model,
            gemini_base_url: None,
            default_provider: ProviderId::Gemini.to_string(),
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            history_window: pchat::DEFAULT_HISTORY_WINDOW,
            system_prompt: None,
            request_timeout_secs: None,
            log_level: "info".to_string(),
        }
    }
}

impl ParleyConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<Self>(source)
            .map_err(|err| ConfigError::parse(format!("invalid config TOML: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| {
            ConfigError::io(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Builds a config from a variable lookup; unset or blank variables keep defaults.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = var("OPENAI_API_KEY") {
            config.openai_api_key = Some(value);
        }
        if let Some(value) = var("OPENAI_MODEL") {
            config.openai_model = value;
        }
        if let Some(value) = var("OPENAI_BASE_URL") {
            config.openai_base_url = Some(value);
        }
        if let Some(value) = var("GEMINI_API_KEY") {
            config.gemini_api_key = Some(value);
        }
        if let Some(value) = var("GEMINI_MODEL") {
            config.gemini_model = value;
        }
        if let Some(value) = var("GEMINI_BASE_URL") {
            config.gemini_base_url = Some(value);
        }
        if let Some(value) = var("DEFAULT_LLM_PROVIDER") {
            config.default_provider = value;
        }
        if let Some(value) = var("TEMPERATURE") {
            config.temperature = parse_var("TEMPERATURE", &value)?;
        }
        if let Some(value) = var("MAX_TOKENS") {
            config.max_tokens = parse_var("MAX_TOKENS", &value)?;
        }
        if let Some(value) = var("HISTORY_WINDOW") {
            config.history_window = parse_var("HISTORY_WINDOW", &value)?;
        }
        if let Some(value) = var("SYSTEM_PROMPT") {
            config.system_prompt = Some(value);
        }
        if let Some(value) = var("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = Some(parse_var("REQUEST_TIMEOUT_SECS", &value)?);
        }
        if let Some(value) = var("LOG_LEVEL") {
            config.log_level = value;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid(
                "temperature must be in the inclusive range 0.0..=2.0",
            ));
        }

        if !(1..=MAX_TOKENS_LIMIT).contains(&self.max_tokens) {
            return Err(ConfigError::invalid(format!(
                "max_tokens must be in the inclusive range 1..={MAX_TOKENS_LIMIT}"
            )));
        }

        if self.history_window == 0 {
            return Err(ConfigError::invalid("history_window must be at least 1"));
        }

        if self.default_provider_id().is_none() {
            return Err(ConfigError::invalid(format!(
                "unknown default_provider '{}', expected openai or gemini",
                self.default_provider
            )));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::invalid(
                "request_timeout_secs must be greater than zero",
            ));
        }

        if self.openai_model.trim().is_empty() || self.gemini_model.trim().is_empty() {
            return Err(ConfigError::invalid("model names must not be empty"));
        }

        Ok(())
    }

    pub fn default_provider_id(&self) -> Option<ProviderId> {
        ProviderId::parse(&self.default_provider)
    }

    pub fn provider_defaults(&self) -> ProviderDefaults {
        ProviderDefaults {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            openai_model: self.openai_model.clone(),
            gemini_model: self.gemini_model.clone(),
        }
    }
}

impl std::fmt::Debug for ParleyConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fn redacted(key: &Option<String>) -> &'static str {
            if key.is_some() { "[REDACTED]" } else { "None" }
        }

        f.debug_struct("ParleyConfig")
            .field("openai_api_key", &redacted(&self.openai_api_key))
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("gemini_api_key", &redacted(&self.gemini_api_key))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("default_provider", &self.default_provider)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("history_window", &self.history_window)
            .field("system_prompt", &self.system_prompt)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|err| ConfigError::parse(format!("{name}='{value}' is not valid: {err}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ParleyConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.openai_model, "gpt-3.5-turbo");
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.history_window, 10);
        assert_eq!(config.log_level, "info");
        config.validate().expect("defaults should validate");
    }

    #[test]
    fn env_lookup_overrides_defaults() {
        let config = ParleyConfig::from_env_with(env(&[
            ("OPENAI_API_KEY", "sk-live"),
            ("DEFAULT_LLM_PROVIDER", "OpenAI"),
            ("TEMPERATURE", "1.1"),
            ("MAX_TOKENS", "256"),
            ("HISTORY_WINDOW", "4"),
            ("REQUEST_TIMEOUT_SECS", "30"),
            ("GEMINI_API_KEY", "   "),
        ]))
        .expect("env config should load");

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-live"));
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.default_provider_id(), Some(ProviderId::OpenAi));
        assert_eq!(config.temperature, 1.1);
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.history_window, 4);
        assert_eq!(config.request_timeout_secs, Some(30));
    }

    #[test]
    fn env_parse_failures_name_the_variable() {
        let err = ParleyConfig::from_env_with(env(&[("MAX_TOKENS", "lots")]))
            .expect_err("non-numeric max tokens");
        assert_eq!(err.kind, ConfigErrorKind::Parse);
        assert!(err.message.contains("MAX_TOKENS"));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        for source in [
            "temperature = 2.5",
            "max_tokens = 0",
            "max_tokens = 4001",
            "history_window = 0",
            "default_provider = \"claude\"",
            "request_timeout_secs = 0",
        ] {
            let err = ParleyConfig::from_toml_str(source).expect_err("value should be rejected");
            assert_eq!(err.kind, ConfigErrorKind::Invalid, "{source}");
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ParleyConfig::from_toml_str("temperature = \"warm\"").expect_err("bad type");
        assert_eq!(err.kind, ConfigErrorKind::Parse);
    }

    #[test]
    fn from_file_reads_toml_and_reports_missing_files() {
        let path = std::env::temp_dir().join(format!("parley-config-{}.toml", std::process::id()));
        std::fs::write(&path, "gemini_model = \"gemini-2.5-pro\"\nsystem_prompt = \"Be brief.\"\n")
            .expect("temp config should be written");

        let config = ParleyConfig::from_file(&path).expect("config file should load");
        assert_eq!(config.gemini_model, "gemini-2.5-pro");
        assert_eq!(config.system_prompt.as_deref(), Some("Be brief."));
        std::fs::remove_file(&path).expect("temp config should be removed");

        let err = ParleyConfig::from_file(&path).expect_err("file is gone");
        assert_eq!(err.kind, ConfigErrorKind::Io);
    }

    #[test]
    fn provider_defaults_follow_config() {
        let config = ParleyConfig {
            temperature: 0.1,
            max_tokens: 99,
            openai_model: "gpt-4o".to_string(),
            ..ParleyConfig::default()
        };
        let defaults = config.provider_defaults();
        assert_eq!(defaults.model_for(ProviderId::OpenAi), "gpt-4o");
        assert_eq!(defaults.max_tokens, 99);
    }
}
