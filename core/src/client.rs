//! The verb surface: `get`, `post`, `put`, `patch`, `delete`.
//!
//! # Design
//! `ApiClient` owns no per-call state, only an `Arc<dyn Transport>`, so it
//! is cheap to clone and safe to share across tasks. Each verb flattens its
//! payload, hands the transport a prepared `ApiCall`, and deserializes the
//! settled JSON value into the caller's response type.

use std::sync::{Arc, OnceLock};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::http::{query_pairs, HttpMethod};
use crate::options::RequestOptions;
use crate::transport::{ApiCall, FetchTransport, InstanceTransport, Transport};

static SHARED: OnceLock<ApiClient> = OnceLock::new();

/// Typed request wrapper over any `Transport`.
///
/// Params for `get`/`delete` and bodies for `post`/`put`/`patch` are any
/// `Serialize` value; pass `&()` to send none.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client backed by a configured client instance (no interceptors).
    pub fn instance(config: &ClientConfig) -> Result<Self, RequestError> {
        Ok(Self::new(InstanceTransport::new(config)?))
    }

    /// Client backed by the bare fetch transport.
    pub fn fetch(config: &ClientConfig) -> Self {
        Self::new(FetchTransport::new(config))
    }

    /// Instance-backed client configured from the environment.
    pub fn from_env() -> Result<Self, RequestError> {
        Self::instance(&ClientConfig::from_env())
    }

    /// Process-wide client, built from the environment on first use.
    pub fn shared() -> Result<&'static ApiClient, RequestError> {
        if let Some(client) = SHARED.get() {
            return Ok(client);
        }
        let client = Self::from_env()?;
        Ok(SHARED.get_or_init(|| client))
    }

    pub async fn get<T, P>(&self, path: &str, params: &P, options: RequestOptions) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let call = ApiCall::new(HttpMethod::Get, path).query(query_pairs(params)?);
        self.dispatch(call.options(options)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.with_body(HttpMethod::Post, path, body, options).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.with_body(HttpMethod::Put, path, body, options).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.with_body(HttpMethod::Patch, path, body, options).await
    }

    pub async fn delete<T, P>(&self, path: &str, params: &P, options: RequestOptions) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let call = ApiCall::new(HttpMethod::Delete, path).query(query_pairs(params)?);
        self.dispatch(call.options(options)).await
    }

    async fn with_body<T, B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let call = ApiCall::new(method, path).body(encode_body(body)?);
        self.dispatch(call.options(options)).await
    }

    async fn dispatch<T: DeserializeOwned>(&self, call: ApiCall) -> Result<T, RequestError> {
        let value = self.transport.send(call).await?;
        serde_json::from_value(value).map_err(|e| RequestError::DeserializationError(e.to_string()))
    }
}

/// Serialize a request body. A value that serializes to `null` means no body.
fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Option<String>, RequestError> {
    let value = serde_json::to_value(body).map_err(|e| RequestError::SerializationError(e.to_string()))?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::to_string(&value)
        .map(Some)
        .map_err(|e| RequestError::SerializationError(e.to_string()))
}
