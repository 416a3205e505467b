//! Shared HTTP client with pre-send and post-receive hooks.
//!
//! DESIGN
//! ======
//! Every request goes through [`HttpClient::send`]:
//!
//! 1. request hooks run in registration order and may edit the request
//! 2. the [`Transport`] performs the round trip
//! 3. non-2xx statuses become [`ApiError::Status`]
//! 4. response hooks run in registration order and observe the outcome
//! 5. the outcome is returned unchanged
//!
//! Hooks only see the outcome by reference, so none of them can swallow an
//! error. [`HttpClient::for_session`] installs the two session hooks:
//! [`BearerAuth`] and [`InvalidateOnUnauthorized`].

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::transport::Transport;
use super::types::error_detail;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::state::auth::AuthStore;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// A fully resolved outgoing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing value with the same name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.into()));
    }
}

/// Status and body of a completed round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Runs before the transport is called.
pub trait RequestHook {
    fn before_send(&self, request: &mut HttpRequest);
}

/// Runs after the transport returns, before the caller sees the outcome.
pub trait ResponseHook {
    fn after_receive(&self, request: &HttpRequest, outcome: &Result<HttpResponse, ApiError>);
}

// =============================================================================
// SESSION HOOKS
// =============================================================================

/// Attaches `Authorization: Bearer <token>` from the live session.
pub struct BearerAuth {
    store: AuthStore,
}

impl BearerAuth {
    #[must_use]
    pub fn new(store: AuthStore) -> Self {
        Self { store }
    }
}

impl RequestHook for BearerAuth {
    fn before_send(&self, request: &mut HttpRequest) {
        let token = self.store.token();
        if !token.is_empty() {
            request.set_header(AUTHORIZATION, format!("Bearer {token}"));
        }
    }
}

/// Clears the local session when the server answers 401.
///
/// The guard redirects to login on the next navigation; this hook never
/// navigates on its own.
pub struct InvalidateOnUnauthorized {
    store: AuthStore,
}

impl InvalidateOnUnauthorized {
    #[must_use]
    pub fn new(store: AuthStore) -> Self {
        Self { store }
    }
}

impl ResponseHook for InvalidateOnUnauthorized {
    fn after_receive(&self, request: &HttpRequest, outcome: &Result<HttpResponse, ApiError>) {
        if let Err(err) = outcome {
            if err.is_unauthorized() {
                log::warn!("{} rejected the session token; clearing local session", request.url);
                self.store.logout();
            }
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Request-issuing facility shared by every view.
///
/// Cloning is cheap; clones share the transport and hooks.
#[derive(Clone)]
pub struct HttpClient {
    config: ClientConfig,
    transport: Rc<dyn Transport>,
    request_hooks: Vec<Rc<dyn RequestHook>>,
    response_hooks: Vec<Rc<dyn ResponseHook>>,
}

impl HttpClient {
    /// A client with no hooks installed.
    pub fn new(config: ClientConfig, transport: Rc<dyn Transport>) -> Self {
        Self { config, transport, request_hooks: Vec::new(), response_hooks: Vec::new() }
    }

    /// A client wired to `store`: bearer injection plus 401 invalidation.
    pub fn for_session(config: ClientConfig, transport: Rc<dyn Transport>, store: &AuthStore) -> Self {
        Self::new(config, transport)
            .with_request_hook(BearerAuth::new(store.clone()))
            .with_response_hook(InvalidateOnUnauthorized::new(store.clone()))
    }

    #[must_use]
    pub fn with_request_hook(mut self, hook: impl RequestHook + 'static) -> Self {
        self.request_hooks.push(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn with_response_hook(mut self, hook: impl ResponseHook + 'static) -> Self {
        self.response_hooks.push(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a request for `path` relative to the configured base URL.
    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: self.config.url(path),
            headers: vec![(ACCEPT.to_owned(), JSON_CONTENT_TYPE.to_owned())],
            body: None,
            timeout: self.config.request_timeout,
        }
    }

    /// Run the hook pipeline and transport for `request`.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or [`ApiError::Status`] for any non-2xx
    /// response, after all response hooks have observed it.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        for hook in &self.request_hooks {
            hook.before_send(&mut request);
        }

        let outcome = match self.transport.send(&request).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(ApiError::Status {
                status: response.status,
                detail: error_detail(&response.body),
            }),
            Err(err) => Err(err),
        };

        if let Err(err) = &outcome {
            log::debug!("{:?} {} failed: {err}", request.method, request.url);
        }

        for hook in &self.response_hooks {
            hook.after_receive(&request, &outcome);
        }
        outcome
    }

    /// `GET path` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::Get, path)).await?;
        decode(&response)
    }

    /// `POST path` with a form-encoded body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, the request, or decoding fails.
    pub async fn post_form<F, T>(&self, path: &str, form: &F) -> Result<T, ApiError>
    where
        F: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_urlencoded::to_string(form).map_err(|e| ApiError::Encode(e.to_string()))?;
        let mut request = self.request(Method::Post, path);
        request.set_header(CONTENT_TYPE, FORM_CONTENT_TYPE);
        request.body = Some(body);
        let response = self.send(request).await?;
        decode(&response)
    }

    /// `method path` with a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, the request, or decoding fails.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        let mut request = self.request(method, path);
        request.set_header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        request.body = Some(body);
        let response = self.send(request).await?;
        decode(&response)
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}
