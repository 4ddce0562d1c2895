#[cfg(feature = "provider-openai")]
pub mod openai;

#[cfg(feature = "provider-gemini")]
pub mod gemini;
