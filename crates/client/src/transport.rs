//! JSON-over-HTTP transport to the restaurant's customer API.
//!
//! The page controller is generic over [`Transport`] so the same flow runs
//! against the real server ([`HttpTransport`]) or a scripted stand-in.

use std::future::Future;

use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;

/// Failures that stop a request from producing a usable response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not JSON.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Endpoint path could not be resolved against the base URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Client could not be built or the request never left.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// A decoded JSON response.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    pub status: u16,
    pub body: Value,
}

impl JsonResponse {
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends JSON requests to paths on the restaurant site.
pub trait Transport {
    /// POST `body` to `path` and decode the JSON reply.
    fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<JsonResponse, TransportError>>;

    /// GET `path` and decode the JSON reply.
    fn get_json(&self, path: &str) -> impl Future<Output = Result<JsonResponse, TransportError>>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport from client configuration.
    ///
    /// The session cookie, when configured, is sent with every request.
    ///
    /// # Errors
    ///
    /// Returns error if the cookie is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie.expose_secret())
                .map_err(|e| TransportError::Unavailable(format!("invalid session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    /// Build a transport for `base_url` with no cookie and no timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_base_url(base_url: Url) -> Result<Self, TransportError> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(path)?)
    }

    async fn decode(response: reqwest::Response) -> Result<JsonResponse, TransportError> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).map_err(|e| {
            debug!(
                status,
                body = %text.chars().take(200).collect::<String>(),
                "response body is not JSON"
            );
            TransportError::Decode(e)
        })?;
        Ok(JsonResponse { status, body })
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, body))]
    async fn post_json(&self, path: &str, body: &Value) -> Result<JsonResponse, TransportError> {
        let url = self.endpoint(path)?;
        let response = self.client.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn get_json(&self, path: &str) -> Result<JsonResponse, TransportError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }
}

/// Scripted [`Transport`] for unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use serde_json::Value;

    use super::{JsonResponse, Transport, TransportError};

    /// A request the page made.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Request {
        pub method: &'static str,
        pub path: String,
        pub body: Option<Value>,
    }

    /// Replays queued responses in order and records every request.
    ///
    /// Each call yields to the scheduler once before answering so overlapping
    /// submits can be observed. Clones share the queue and the log.
    #[derive(Debug, Clone, Default)]
    pub struct ScriptedTransport {
        responses: Rc<RefCell<VecDeque<Result<JsonResponse, TransportError>>>>,
        requests: Rc<RefCell<Vec<Request>>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, status: u16, body: Value) -> &Self {
            self.responses
                .borrow_mut()
                .push_back(Ok(JsonResponse::new(status, body)));
            self
        }

        pub fn fail(&self, error: TransportError) -> &Self {
            self.responses.borrow_mut().push_back(Err(error));
            self
        }

        pub fn requests(&self) -> Vec<Request> {
            self.requests.borrow().clone()
        }

        async fn answer(&self, request: Request) -> Result<JsonResponse, TransportError> {
            self.requests.borrow_mut().push(request);
            tokio::task::yield_now().await;
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Unavailable("no scripted response".into())))
        }
    }

    impl Transport for ScriptedTransport {
        async fn post_json(&self, path: &str, body: &Value) -> Result<JsonResponse, TransportError> {
            self.answer(Request {
                method: "POST",
                path: path.to_string(),
                body: Some(body.clone()),
            })
            .await
        }

        async fn get_json(&self, path: &str) -> Result<JsonResponse, TransportError> {
            self.answer(Request {
                method: "GET",
                path: path.to_string(),
                body: None,
            })
            .await
        }
    }
}
