//! Transports that move an [`HttpRequest`] over the wire.
//!
//! Native builds use `reqwest`; browser builds (`hydrate`) use `gloo-net`
//! fetch. Both enforce the per-request timeout carried on the request and
//! return every HTTP status as `Ok`, leaving status policy to the client.

use async_trait::async_trait;

use super::http::{HttpRequest, HttpResponse};
use crate::error::ApiError;

/// One round trip: request out, status and body back.
#[async_trait(?Send)]
pub trait Transport {
    /// Send `request` and collect the full response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] or [`ApiError::Timeout`] when no
    /// response was received. HTTP error statuses are not errors here.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

// =============================================================================
// REQWEST
// =============================================================================

#[cfg(not(target_arch = "wasm32"))]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new() -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("diary-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(format!("http client build failed: {e}")))?;
        Ok(Self { http })
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        use super::http::Method;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, &request.url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(request.timeout)
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

// =============================================================================
// GLOO (BROWSER)
// =============================================================================

#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        use gloo_net::http::Request;

        use super::http::Method;

        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Patch => Request::patch(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = match &request.body {
            Some(body) => {
                let prepared = builder
                    .body(body.clone())
                    .map_err(|e| ApiError::Encode(e.to_string()))?;
                race_timeout(prepared.send(), request.timeout).await?
            }
            None => race_timeout(builder.send(), request.timeout).await?,
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(feature = "hydrate")]
async fn race_timeout<F>(
    request: F,
    timeout: std::time::Duration,
) -> Result<gloo_net::http::Response, ApiError>
where
    F: std::future::Future<Output = Result<gloo_net::http::Response, gloo_net::Error>>,
{
    use futures::future::{Either, select};

    let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
    let request = std::pin::pin!(request);
    let timer = std::pin::pin!(gloo_timers::future::TimeoutFuture::new(millis));
    match select(request, timer).await {
        Either::Left((result, _)) => result.map_err(|e| ApiError::Network(e.to_string())),
        Either::Right(_) => Err(ApiError::Timeout(timeout)),
    }
}
