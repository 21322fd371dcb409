//! Transport on a configured client instance.
//!
//! # Design
//! Base URL, timeout and default headers are baked into one `reqwest::Client`
//! when the transport is built, so each call only names what differs: path,
//! query, body, per-call headers. Interceptors wrap every call.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::http::{decode_body, merge_headers, settle};
use crate::interceptor::{HttpInterceptor, RequestContext};
use crate::transport::{resolve_url, with_signal, ApiCall, Transport};

#[derive(Clone)]
pub struct InstanceTransport {
    client: reqwest::Client,
    base_url: String,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl std::fmt::Debug for InstanceTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceTransport")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

impl InstanceTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, RequestError> {
        let mut builder = reqwest::Client::builder().default_headers(header_map(&config.default_headers)?);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            interceptors: Vec::new(),
        })
    }

    /// Register an interceptor; interceptors run in registration order.
    pub fn with_interceptor(mut self, interceptor: impl HttpInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn exchange(&self, call: &ApiCall, ctx: &RequestContext) -> Result<Value, RequestError> {
        let mut builder = self
            .client
            .request(call.method.to_reqwest(), ctx.url.as_str())
            .query(&call.query)
            .headers(header_map(&call.options.headers)?);
        if let Some(body) = call.wire_body() {
            builder = builder.body(body.to_string());
        }
        if let Some(timeout) = call.options.timeout {
            builder = builder.timeout(timeout);
        }

        for interceptor in &self.interceptors {
            builder = interceptor.on_before_send(ctx, builder)?;
        }

        let response = builder.send().await?;
        for interceptor in &self.interceptors {
            interceptor.on_response(ctx, &response)?;
        }

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = match response.text().await {
            Ok(text) => decode_body(&content_type, &text),
            Err(e) => {
                tracing::debug!(url = %ctx.url, error = %e, "failed to read response body");
                Value::Null
            }
        };
        settle(status, body)
    }
}

#[async_trait]
impl Transport for InstanceTransport {
    async fn send(&self, call: ApiCall) -> Result<Value, RequestError> {
        let url = resolve_url(&self.base_url, &call.path)?;
        let ctx = RequestContext {
            method: call.method,
            url: url.to_string(),
        };

        let outcome = with_signal(call.options.signal.as_ref(), self.exchange(&call, &ctx)).await;
        if let Err(error) = &outcome {
            for interceptor in &self.interceptors {
                interceptor.on_error(&ctx, error);
            }
        }
        outcome
    }
}

/// Convert ordered pairs into a `HeaderMap`. Later pairs replace earlier ones
/// with the same (case-insensitive) name.
fn header_map(pairs: &[(String, String)]) -> Result<HeaderMap, RequestError> {
    let mut map = HeaderMap::with_capacity(pairs.len());
    for (name, value) in merge_headers(&[], pairs) {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| RequestError::InvalidHeader(format!("{name}: {e}")))?;
        let header_value =
            HeaderValue::from_str(&value).map_err(|e| RequestError::InvalidHeader(format!("{name}: {e}")))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
