//! Provider adapters, selection, and the local fallback responder.
//!
//! ```rust
//! use pprovider::{LocalFallbackResponder, Message, ProviderId};
//!
//! let reply = LocalFallbackResponder::new().respond(&[Message::user("hello")]);
//! assert_eq!(reply.provider, ProviderId::Local);
//! ```

mod adapter;
pub mod adapters;
mod credentials;
mod error;
pub mod extract;
mod hooks;
mod local;
mod model;
mod registry;
mod router;
pub mod transport;

pub mod prelude;

pub use adapter::{ProviderAdapter, ProviderFuture};
pub use credentials::{SecretString, SecureCredentialManager};
pub use error::{ProviderError, ProviderErrorKind};
pub use hooks::{FallbackReason, NoopRoutingHooks, RoutingHooks};
pub use local::{LOCAL_GREETING, LOCAL_MODEL, LocalFallbackResponder};
pub use model::{FinishReason, Message, ProviderId, ProviderResult, Role};
pub use registry::ProviderRegistry;
pub use router::{ProviderDefaults, ProviderRouter, ProviderRouterBuilder, RouteRequest};
pub use pcommon::{GenerationConfig, ValidationError};

#[cfg(feature = "provider-gemini")]
pub use adapters::gemini::{GEMINI_BASE_URL, GeminiAdapter};
#[cfg(feature = "provider-openai")]
pub use adapters::openai::{OPENAI_BASE_URL, OpenAiAdapter};
#[cfg(feature = "http-transport")]
pub use transport::HttpTransport;
