//! The single request pipeline.
//!
//! Every backend call in this crate goes through [`ApiClient`]: credential
//! injection, dispatch, and failure classification happen here and nowhere
//! else. Facades bind paths and types; they never look at raw responses.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, message_from_body};
use crate::events::{SessionEvent, SessionEventBus};
use crate::token::TokenStore;

/// Ends the session exactly once when the backend rejects the credential.
///
/// Several requests can be in flight when a credential goes stale; each of
/// them will observe a 401 and call [`SessionGuard::trip`]. The first call
/// clears the store and publishes a single [`SessionEvent::SessionExpired`];
/// the rest are no-ops. [`SessionGuard::arm`] re-enables the guard when a
/// fresh credential is issued.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    inner: Arc<GuardInner>,
}

#[derive(Debug)]
struct GuardInner {
    store: Arc<dyn TokenStore>,
    events: SessionEventBus,
    tripped: AtomicBool,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn TokenStore>, events: SessionEventBus) -> Self {
        Self {
            inner: Arc::new(GuardInner {
                store,
                events,
                tripped: AtomicBool::new(false),
            }),
        }
    }

    /// Re-enable the guard for a freshly issued credential.
    pub fn arm(&self) {
        self.inner.tripped.store(false, Ordering::SeqCst);
    }

    /// Put the guard in the tripped state without announcing anything.
    ///
    /// Explicit logout uses this so a later 401 from an unauthenticated
    /// request does not masquerade as session expiry.
    pub fn disarm(&self) {
        self.inner.tripped.store(true, Ordering::SeqCst);
    }

    /// Force session expiry: clear the credential, announce it once.
    pub fn trip(&self) {
        if self.inner.tripped.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::warn!("credential rejected by backend; ending session");
        self.inner.store.clear();
        self.inner.events.publish(SessionEvent::SessionExpired);
    }

    pub fn is_tripped(&self) -> bool {
        self.inner.tripped.load(Ordering::SeqCst)
    }
}

/// Typed HTTP client for the PolicyDesk backend.
///
/// Cheap to clone; clones share the connection pool, the token store and
/// the session guard.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    store: Arc<dyn TokenStore>,
    guard: SessionGuard,
    events: SessionEventBus,
}

impl ApiClient {
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Self {
        let events = SessionEventBus::new();
        let guard = SessionGuard::new(store.clone(), events.clone());

        Self {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                config,
                store,
                guard,
                events,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    /// The bus carrying login/logout/expiry announcements.
    pub fn events(&self) -> &SessionEventBus {
        &self.inner.events
    }

    pub(crate) fn guard(&self) -> &SessionGuard {
        &self.inner.guard
    }

    // ── typed entry points ──────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.builder(Method::GET, path);
        let response = self.dispatch(Method::GET, path, builder).await?;
        parse_json(response).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.builder(Method::POST, path).json(body);
        let response = self.dispatch(Method::POST, path, builder).await?;
        parse_json(response).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.builder(Method::PUT, path).json(body);
        let response = self.dispatch(Method::PUT, path, builder).await?;
        parse_json(response).await
    }

    /// Bodiless POST whose response body is parsed (204-friendly for
    /// `Option`-shaped results).
    pub async fn post_action<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.builder(Method::POST, path);
        let response = self.dispatch(Method::POST, path, builder).await?;
        parse_json(response).await
    }

    /// Bodiless PUT whose response body is parsed.
    pub async fn put_action<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.builder(Method::PUT, path);
        let response = self.dispatch(Method::PUT, path, builder).await?;
        parse_json(response).await
    }

    /// Bodiless PATCH whose response body is parsed.
    pub async fn patch_action<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.builder(Method::PATCH, path);
        let response = self.dispatch(Method::PATCH, path, builder).await?;
        parse_json(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path).await
    }

    /// Bodiless request whose response body is discarded. A 204 (or any
    /// other 2xx) succeeds with `()`.
    pub async fn execute(&self, method: Method, path: &str) -> Result<(), ApiError> {
        let builder = self.builder(method.clone(), path);
        self.dispatch(method, path, builder).await?;
        Ok(())
    }

    /// Multipart upload (attachments); everything else about the pipeline
    /// is unchanged.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let builder = self.builder(Method::POST, path).multipart(form);
        let response = self.dispatch(Method::POST, path, builder).await?;
        parse_json(response).await
    }

    // ── pipeline ────────────────────────────────────────────────────────

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.inner.config.base_url(), path);
        let mut builder = self.inner.http.request(method, url);

        if let Some(token) = self.inner.store.get() {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "transport failure");
            ApiError::Network(e.to_string())
        })?;

        self.classify(&method, path, response).await
    }

    async fn classify(
        &self,
        method: &Method,
        path: &str,
        response: Response,
    ) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            tracing::debug!(%method, path, status = status.as_u16(), "request ok");
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = message_from_body(status, &body);
        tracing::warn!(%method, path, status = status.as_u16(), %message, "request failed");

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                self.inner.guard.trip();
                ApiError::Unauthorized { message }
            }
            StatusCode::NOT_FOUND => ApiError::NotFound { message },
            s if s.is_client_error() => ApiError::Validation { status: s.as_u16(), message },
            s if s.is_server_error() => ApiError::Server { status: s.as_u16(), message },
            s => ApiError::Unexpected { status: s.as_u16(), message },
        })
    }
}

/// Parse a successful response body as `T`.
///
/// A 204 or empty body is read as JSON `null`, so `Option<T>`-shaped (and
/// unit) results succeed instead of tripping a parse error.
async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if status == StatusCode::NO_CONTENT || bytes.is_empty() {
        return serde_json::from_value(serde_json::Value::Null).map_err(|e| ApiError::Unexpected {
            status: status.as_u16(),
            message: format!("empty response where a body was expected: {e}"),
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| ApiError::Unexpected {
        status: status.as_u16(),
        message: format!("malformed response body: {e}"),
    })
}
