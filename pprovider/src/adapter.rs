//! The uniform capability every LLM backend adapter exposes.

use pcommon::{BoxFuture, GenerationConfig};

use crate::{Message, ProviderError, ProviderId, ProviderResult};

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;

/// One external LLM backend.
///
/// `generate` makes exactly one outbound call and never retries; the router
/// decides what happens when it fails.
pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    fn generate<'a>(
        &'a self,
        messages: Vec<Message>,
        config: GenerationConfig,
    ) -> ProviderFuture<'a, Result<ProviderResult, ProviderError>>;
}

#[cfg(test)]
mod tests {
    use pcommon::BoxFuture;

    use super::ProviderFuture;

    fn shared_future<'a>(value: &'a str) -> BoxFuture<'a, usize> {
        Box::pin(async move { value.len() })
    }

    #[tokio::test]
    async fn provider_futures_are_the_shared_boxed_future() {
        let future: ProviderFuture<'_, usize> = shared_future("ping");
        assert_eq!(future.await, 4);
    }
}
