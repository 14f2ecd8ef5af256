//! Integration tests for Bistro.
//!
//! The tests drive [`bistro_client::OrderPage`] over real HTTP against
//! [`StubServer`], an axum app on an ephemeral port that answers each
//! `(method, path)` with a canned reply and records what it received.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bistro-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `order_flow` - Placing orders: success, login redirect, failures
//! - `bookings` - Private-room and event forms
//! - `history` - Customer data endpoint

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use bistro_client::ClientConfig;
use bistro_client::platform::{Host, RecordingNavigator, RecordingNotifier};
use bistro_client::storage::MemorySessionStorage;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Body the stub answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    /// Raw text served as `text/html`, for unreadable-body cases.
    Text(String),
}

/// One canned route.
#[derive(Debug, Clone)]
pub struct StubRoute {
    pub method: Method,
    pub path: String,
    pub status: StatusCode,
    pub reply: Reply,
}

impl StubRoute {
    #[must_use]
    pub fn post(path: &str, status: u16, body: Value) -> Self {
        Self::new(Method::POST, path, status, Reply::Json(body))
    }

    #[must_use]
    pub fn get(path: &str, status: u16, body: Value) -> Self {
        Self::new(Method::GET, path, status, Reply::Json(body))
    }

    #[must_use]
    pub fn post_text(path: &str, status: u16, text: &str) -> Self {
        Self::new(Method::POST, path, status, Reply::Text(text.to_string()))
    }

    fn new(method: Method, path: &str, status: u16, reply: Reply) -> Self {
        Self {
            method,
            path: path.to_string(),
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            reply,
        }
    }
}

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    /// Parsed JSON body; `Value::Null` when empty or not JSON.
    pub body: Value,
    pub cookie: Option<String>,
}

#[derive(Clone)]
struct StubState {
    routes: Arc<HashMap<(Method, String), (StatusCode, Reply)>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let recorded = RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        cookie: headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(recorded);

    match state.routes.get(&(method, path)) {
        Some((status, Reply::Json(value))) => (*status, axum::Json(value.clone())).into_response(),
        Some((status, Reply::Text(text))) => (
            *status,
            [(header::CONTENT_TYPE, "text/html")],
            text.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "no stub route").into_response(),
    }
}

/// Customer API stand-in on `127.0.0.1`. Stops when dropped.
pub struct StubServer {
    base_url: Url,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Bind an ephemeral port and start serving `routes`.
    ///
    /// # Errors
    ///
    /// Returns error if the listener cannot be bound.
    pub async fn start(routes: Vec<StubRoute>) -> std::io::Result<Self> {
        let state = StubState {
            routes: Arc::new(
                routes
                    .into_iter()
                    .map(|r| ((r.method, r.path), (r.status, r.reply)))
                    .collect(),
            ),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = Arc::clone(&state.requests);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = Router::new().fallback(handle).with_state(state);
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}/"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        Ok(Self {
            base_url,
            requests,
            task,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A base URL nothing is listening on.
///
/// # Errors
///
/// Returns error if a temporary listener cannot be bound.
pub async fn unreachable_base_url() -> std::io::Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Url::parse(&format!("http://{addr}/"))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
}

/// Client configuration pointed at `base_url`, optionally with a session
/// cookie.
///
/// # Errors
///
/// Returns error if the configuration is rejected.
pub fn config_for(
    base_url: &Url,
    cookie: Option<&str>,
) -> Result<ClientConfig, bistro_client::config::ConfigError> {
    let base = base_url.to_string();
    let cookie = cookie.map(str::to_string);
    ClientConfig::from_lookup(|key| match key {
        "BISTRO_BASE_URL" => Some(base.clone()),
        "BISTRO_SESSION_COOKIE" => cookie.clone(),
        _ => None,
    })
}

/// Recording collaborators plus the [`Host`] built from them.
pub struct TestHost {
    pub storage: MemorySessionStorage,
    pub navigator: RecordingNavigator,
    pub notifier: RecordingNotifier,
}

impl TestHost {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: MemorySessionStorage::new(),
            navigator: RecordingNavigator::new(),
            notifier: RecordingNotifier::new(),
        }
    }

    /// A host sharing state with these recorders.
    #[must_use]
    pub fn host(&self, config: &ClientConfig) -> Host {
        Host::new(
            self.storage.clone(),
            self.navigator.clone(),
            self.notifier.clone(),
            config.login_url(),
        )
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}
