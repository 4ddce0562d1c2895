//! JSON-over-HTTP transport seam shared by the remote adapters.
//!
//! Adapters build a request body and hand it to a [`ProviderTransport`]; the
//! transport owns the single outbound call and the mapping from HTTP failures
//! to [`ProviderError`] kinds. Tests substitute their own transport.

use serde_json::Value;

use crate::{ProviderError, ProviderFuture, SecretString};

pub enum TransportAuth {
    Bearer(SecretString),
    Header {
        name: &'static str,
        value: SecretString,
    },
}

impl std::fmt::Debug for TransportAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("TransportAuth::Bearer([REDACTED])"),
            Self::Header { name, .. } => f
                .debug_struct("TransportAuth::Header")
                .field("name", name)
                .field("value", &"[REDACTED]")
                .finish(),
        }
    }
}

#[derive(Debug)]
pub struct TransportRequest {
    pub url: String,
    pub auth: TransportAuth,
    pub body: Value,
}

pub trait ProviderTransport: Send + Sync + std::fmt::Debug {
    fn post_json<'a>(&'a self, request: TransportRequest)
    -> ProviderFuture<'a, Result<Value, ProviderError>>;
}

/// Pulls `error.message` out of the `{ "error": { "message": ... } }` envelope
/// that both OpenAI and Gemini use for failures.
pub fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<Value>(body).ok()?;
    let message = parsed.get("error")?.get("message")?.as_str()?;
    Some(message.to_string())
}

/// Maps a non-success HTTP status code to a failure kind.
pub fn classify_status(status: u16, message: impl Into<String>) -> ProviderError {
    match status {
        401 | 403 => ProviderError::authentication(message),
        429 => ProviderError::quota(message),
        _ => ProviderError::network(message),
    }
}

#[cfg(feature = "http-transport")]
pub use http::HttpTransport;

#[cfg(feature = "http-transport")]
mod http {
    use reqwest::{Client, RequestBuilder, Response};
    use serde_json::Value;

    use super::{
        ProviderTransport, TransportAuth, TransportRequest, classify_status,
        extract_error_message,
    };
    use crate::{ProviderError, ProviderFuture};

    /// `reqwest`-backed transport; timeouts, if any, come from the injected client.
    #[derive(Debug, Clone, Default)]
    pub struct HttpTransport {
        client: Client,
    }

    impl HttpTransport {
        pub fn new(client: Client) -> Self {
            Self { client }
        }

        fn apply_auth(builder: RequestBuilder, auth: &TransportAuth) -> RequestBuilder {
            match auth {
                TransportAuth::Bearer(key) => builder.bearer_auth(key.expose()),
                TransportAuth::Header { name, value } => builder.header(*name, value.expose()),
            }
        }

        async fn parse_error(response: Response) -> ProviderError {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body)
                .unwrap_or_else(|| format!("provider request failed with status {status}"));

            classify_status(status.as_u16(), message)
        }
    }

    impl ProviderTransport for HttpTransport {
        fn post_json<'a>(
            &'a self,
            request: TransportRequest,
        ) -> ProviderFuture<'a, Result<Value, ProviderError>> {
            Box::pin(async move {
                let builder = self.client.post(&request.url).json(&request.body);
                let response = Self::apply_auth(builder, &request.auth)
                    .send()
                    .await
                    .map_err(|err| {
                        if err.is_timeout() {
                            ProviderError::network(format!("request timed out: {err}"))
                        } else {
                            ProviderError::network(err.to_string())
                        }
                    })?;

                if !response.status().is_success() {
                    return Err(Self::parse_error(response).await);
                }

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|err| ProviderError::network(err.to_string()))?;

                serde_json::from_slice::<Value>(&bytes).map_err(|err| {
                    ProviderError::malformed_response(format!(
                        "response body is not valid JSON: {err}"
                    ))
                })
            })
        }
    }
}
