//! Interceptor hooks for the instance transport.
//!
//! Interceptors run in registration order. They can tweak the request
//! builder before send, observe every response that arrives (whatever its
//! status), and observe every failure before it reaches the caller. Hooks are
//! synchronous and should stay cheap.

use reqwest::header::{HeaderValue, AUTHORIZATION};

use crate::error::RequestError;
use crate::http::HttpMethod;

/// Describes the call an interceptor is looking at.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: HttpMethod,
    pub url: String,
}

pub trait HttpInterceptor: Send + Sync {
    /// Return the (possibly modified) builder, or an error to short-circuit
    /// the call before anything is sent.
    fn on_before_send(
        &self,
        _ctx: &RequestContext,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, RequestError> {
        Ok(builder)
    }

    /// Called once the response head arrives, before its body is read.
    fn on_response(&self, _ctx: &RequestContext, _response: &reqwest::Response) -> Result<(), RequestError> {
        Ok(())
    }

    fn on_error(&self, _ctx: &RequestContext, _error: &RequestError) {}
}

/// Emits `tracing` events for each call. Never logs headers or bodies.
#[derive(Debug, Clone, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &RequestContext,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, RequestError> {
        tracing::debug!(target: "api_request::http", method = %ctx.method, url = %ctx.url, "sending request");
        Ok(builder)
    }

    fn on_response(&self, ctx: &RequestContext, response: &reqwest::Response) -> Result<(), RequestError> {
        tracing::debug!(
            target: "api_request::http",
            method = %ctx.method,
            url = %ctx.url,
            status = response.status().as_u16(),
            "response received"
        );
        Ok(())
    }

    fn on_error(&self, ctx: &RequestContext, error: &RequestError) {
        tracing::debug!(target: "api_request::http", method = %ctx.method, url = %ctx.url, err = %error, "request failed");
    }
}

/// Attaches `Authorization: Bearer <token>` to every request.
///
/// A caller-supplied `authorization` header on an individual call is left
/// untouched.
#[derive(Clone)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth").field("token", &"<redacted>").finish()
    }
}

impl HttpInterceptor for BearerAuth {
    fn on_before_send(
        &self,
        _ctx: &RequestContext,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, RequestError> {
        if self.token.is_empty() {
            return Ok(builder);
        }
        // Inspect what the builder already carries without consuming it.
        let (client, request) = builder.build_split();
        let mut request = request?;
        if !request.headers().contains_key(AUTHORIZATION) {
            let value: HeaderValue = format!("Bearer {}", self.token)
                .parse()
                .map_err(|_| RequestError::InvalidHeader("bearer token is not a valid header value".to_string()))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        Ok(reqwest::RequestBuilder::from_parts(client, request))
    }
}
