//! Typed HTTP request wrapper for a JSON API.
//!
//! # Overview
//! `ApiClient` exposes `get`, `post`, `put`, `patch` and `delete` over a
//! pluggable `Transport`, returning the deserialized response body or a
//! `RequestError`. Two transports ship with the crate:
//!
//! - `InstanceTransport`: one configured client (base URL, timeout, default
//!   headers) plus `HttpInterceptor` hooks.
//! - `FetchTransport`: a bare HTTP primitive; URL, query, headers and body
//!   handling are done by pure `build_request` / `parse_response` steps.
//!
//! # Design
//! - Query stringification, header merging and body decoding live in
//!   `http` and are shared, so both transports behave identically.
//! - Every non-2xx status becomes `RequestError::Http` with the status and
//!   best-effort parsed body; unparsable bodies degrade to `null`.
//! - Cancellation is cooperative through `RequestOptions::signal`.
//!
//! ```no_run
//! use api_request::{ApiClient, ClientConfig, RequestOptions};
//! use serde_json::Value;
//!
//! # async fn run() -> Result<(), api_request::RequestError> {
//! let client = ApiClient::instance(&ClientConfig::from_env())?;
//! let todos: Value = client.get("/todos", &(), RequestOptions::new()).await?;
//! # let _ = todos;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod options;
pub mod transport;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{HttpError, RequestError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use interceptor::{BearerAuth, HttpInterceptor, LoggingInterceptor, RequestContext};
pub use options::RequestOptions;
pub use transport::{ApiCall, FetchTransport, InstanceTransport, Transport};
