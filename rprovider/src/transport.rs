//! HTTP transport trait and reqwest-based implementation.
//!
//! Adapters and search backends describe one outbound call as an
//! [`HttpRequest`] and receive the decoded JSON body. Non-success statuses,
//! network failures and undecodable bodies all come back as [`ProviderError`].
//!
//! ```rust
//! use std::time::Duration;
//!
//! use rprovider::{HttpMethod, HttpRequest};
//!
//! let request = HttpRequest::post("https://example.test/v1/chat", serde_json::json!({"x": 1}))
//!     .with_header("Authorization", "Bearer token")
//!     .with_timeout(Duration::from_secs(5));
//!
//! assert_eq!(request.method, HttpMethod::Post);
//! assert_eq!(request.header("authorization"), Some("Bearer token"));
//! ```

use std::time::Duration;

use serde_json::Value;

use crate::{ProviderError, ProviderFuture};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(body),
            ..Self::get(url)
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    fn send<'a>(&'a self, request: HttpRequest) -> ProviderFuture<'a, Result<Value, ProviderError>>;
}

/// Keeps at most `limit` characters of an upstream error body for logs.
pub(crate) fn truncate_body(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}

#[cfg(feature = "http-transport")]
pub use http::ReqwestTransport;

#[cfg(feature = "http-transport")]
mod http {
    use reqwest::{Client, Response, StatusCode};
    use serde_json::Value;

    use super::{HttpMethod, HttpRequest, HttpTransport, truncate_body};
    use crate::{ProviderError, ProviderFuture};

    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        pub fn new(client: Client) -> Self {
            Self { client }
        }

        async fn parse_error(response: Response) -> ProviderError {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = format!(
                "request failed with status {status}: {}",
                truncate_body(&body, 200)
            );

            let error = match status {
                StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                    ProviderError::timeout(message)
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::credential_missing(message)
                }
                _ => ProviderError::transport(message),
            };
            error.with_status(status.as_u16())
        }
    }

    impl HttpTransport for ReqwestTransport {
        fn send<'a>(
            &'a self,
            request: HttpRequest,
        ) -> ProviderFuture<'a, Result<Value, ProviderError>> {
            Box::pin(async move {
                let mut builder = match request.method {
                    HttpMethod::Get => self.client.get(&request.url),
                    HttpMethod::Post => self.client.post(&request.url),
                };

                builder = builder.timeout(request.timeout);
                if !request.query.is_empty() {
                    builder = builder.query(&request.query);
                }
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                if let Some(body) = &request.body {
                    builder = builder.json(body);
                }

                let response = builder.send().await.map_err(|err| {
                    if err.is_timeout() {
                        ProviderError::timeout(err.to_string())
                    } else {
                        ProviderError::transport(err.to_string())
                    }
                })?;

                if !response.status().is_success() {
                    return Err(Self::parse_error(response).await);
                }

                response
                    .json::<Value>()
                    .await
                    .map_err(|err| ProviderError::malformed_response(err.to_string()))
            })
        }
    }
}
