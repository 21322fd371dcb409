//! The capability both transports implement.
//!
//! # Design
//! `ApiClient` does all the typed work (query flattening, body
//! serialization, response deserialization) and hands a transport a fully
//! prepared `ApiCall`. A transport only performs the exchange and settles it
//! into a JSON value or a `RequestError`, which keeps the trait object-safe
//! and lets callers hold an `Arc<dyn Transport>` without caring which one
//! backs it.

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::RequestError;
use crate::http::HttpMethod;
use crate::options::RequestOptions;

pub mod fetch;
pub mod instance;

pub use fetch::FetchTransport;
pub use instance::InstanceTransport;

/// A prepared call: everything a transport needs, already serialized.
#[derive(Debug, Clone)]
pub struct ApiCall {
    pub method: HttpMethod,
    /// Relative to the base URL, or an absolute URL.
    pub path: String,
    /// Query pairs with nulls already removed.
    pub query: Vec<(String, String)>,
    /// JSON request body. Ignored for `GET`.
    pub body: Option<String>,
    pub options: RequestOptions,
}

impl ApiCall {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// The body to put on the wire, honoring the verb.
    pub(crate) fn wire_body(&self) -> Option<&str> {
        if self.method.allows_body() {
            self.body.as_deref()
        } else {
            None
        }
    }
}

/// Performs one HTTP exchange and settles it.
///
/// Implementations return the decoded body for a 2xx status and
/// `RequestError::Http` otherwise; see `crate::http::settle`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, call: ApiCall) -> Result<Value, RequestError>;
}

/// Join `path` onto `base_url`. Absolute URLs pass through untouched.
pub(crate) fn resolve_url(base_url: &str, path: &str) -> Result<reqwest::Url, RequestError> {
    let joined = if has_scheme(path) {
        path.to_string()
    } else if path.is_empty() {
        base_url.to_string()
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    };
    reqwest::Url::parse(&joined).map_err(|e| RequestError::InvalidUrl(format!("{joined}: {e}")))
}

/// Whether `path` starts with `scheme:`, judged only on the text before the
/// first `/`, `?` or `#` so a URL inside a query string does not count.
fn has_scheme(path: &str) -> bool {
    let head = path.split(['/', '?', '#']).next().unwrap_or("");
    let Some((scheme, _)) = head.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && reqwest::Url::parse(path).is_ok()
}

/// Run `exchange` unless `signal` fires first, in which case the exchange is
/// dropped mid-flight and the call fails with `RequestError::Aborted`.
pub(crate) async fn with_signal<F, T>(signal: Option<&CancellationToken>, exchange: F) -> Result<T, RequestError>
where
    F: Future<Output = Result<T, RequestError>>,
{
    match signal {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(RequestError::Aborted),
                outcome = exchange => outcome,
            }
        }
        None => exchange.await,
    }
}
