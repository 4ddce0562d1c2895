//! Reply-text extraction over backend-specific response shapes.
//!
//! Backends nest the generated text differently. A [`ResponseExtractor`] holds
//! an ordered list of pure strategies and takes the first non-empty answer;
//! when every strategy misses, the raw payload is dumped as compact JSON so a
//! successful-but-unexpected response is still delivered.
//!
//! ```rust
//! use pprovider::extract::ResponseExtractor;
//! use serde_json::json;
//!
//! let extractor = ResponseExtractor::gemini();
//! let payload = json!({
//!     "candidates": [{ "content": { "parts": [{ "text": "Hello" }, { "text": " there" }] } }]
//! });
//!
//! let extracted = extractor.extract(&payload);
//! assert_eq!(extracted.text, "Hello there");
//! assert_eq!(extracted.strategy, Some("candidate_content_parts"));
//! ```

use serde_json::Value;

pub type ExtractionStrategy = fn(&Value) -> Option<String>;

/// Multiplier applied to the whitespace word count when a backend omits billed tokens.
pub const TOKENS_PER_WORD: f64 = 1.3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    /// Name of the strategy that matched; `None` means the raw payload dump.
    pub strategy: Option<&'static str>,
}

#[derive(Clone, Default)]
pub struct ResponseExtractor {
    strategies: Vec<(&'static str, ExtractionStrategy)>,
}

impl ResponseExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, name: &'static str, strategy: ExtractionStrategy) -> Self {
        self.strategies.push((name, strategy));
        self
    }

    pub fn gemini() -> Self {
        Self::new()
            .with_strategy("flat_text", flat_text)
            .with_strategy("result_parts", result_parts)
            .with_strategy("candidate_content_parts", candidate_content_parts)
            .with_strategy("candidate_content_list_parts", candidate_content_list_parts)
    }

    pub fn openai() -> Self {
        Self::new()
            .with_strategy("choice_message_content", choice_message_content)
            .with_strategy("flat_text", flat_text)
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|(name, _)| *name).collect()
    }

    pub fn extract(&self, payload: &Value) -> Extracted {
        for (name, strategy) in &self.strategies {
            if let Some(text) = strategy(payload) {
                return Extracted {
                    text,
                    strategy: Some(*name),
                };
            }
        }

        Extracted {
            text: payload.to_string(),
            strategy: None,
        }
    }
}

impl std::fmt::Debug for ResponseExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseExtractor")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

/// `{ "text": "..." }`
pub fn flat_text(payload: &Value) -> Option<String> {
    non_empty(payload.get("text")?.as_str()?)
}

/// `{ "result": { "parts": [...] } }`
pub fn result_parts(payload: &Value) -> Option<String> {
    join_parts(payload.get("result")?.get("parts")?)
}

/// `{ "candidates": [{ "content": { "parts": [...] } }] }`
pub fn candidate_content_parts(payload: &Value) -> Option<String> {
    join_parts(
        payload
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?,
    )
}

/// `{ "candidates": [{ "content": [{ "parts": [...] }] }] }`
pub fn candidate_content_list_parts(payload: &Value) -> Option<String> {
    join_parts(
        payload
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get(0)?
            .get("parts")?,
    )
}

/// `{ "choices": [{ "message": { "content": "..." } }] }`
pub fn choice_message_content(payload: &Value) -> Option<String> {
    non_empty(
        payload
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str()?,
    )
}

pub fn word_count(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}

pub fn estimate_tokens(text: &str) -> u32 {
    (f64::from(word_count(text)) * TOKENS_PER_WORD) as u32
}

fn join_parts(parts: &Value) -> Option<String> {
    let text = parts
        .as_array()?
        .iter()
        .filter_map(part_text)
        .collect::<String>();

    non_empty(&text)
}

// Parts arrive either as bare strings or as `{ "text": ... }` objects.
fn part_text(part: &Value) -> Option<&str> {
    match part {
        Value::String(text) => Some(text.as_str()),
        Value::Object(fields) => fields.get("text")?.as_str(),
        _ => None,
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
