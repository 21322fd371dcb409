//! Transport on a bare HTTP primitive.
//!
//! # Design
//! Nothing is delegated to the HTTP library beyond moving bytes: the URL,
//! query string, header set and body are assembled by `build_request`, and
//! the response is sniffed and settled by `parse_response`. Both are pure,
//! so the whole request shape can be checked without a network. `send` is
//! the only method that performs I/O.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::http::{decode_body, merge_headers, settle, HttpRequest, HttpResponse};
use crate::transport::{resolve_url, with_signal, ApiCall, Transport};

#[derive(Debug, Clone)]
pub struct FetchTransport {
    base_url: String,
    default_headers: Vec<(String, String)>,
    timeout: Option<std::time::Duration>,
    http: reqwest::Client,
}

impl FetchTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_headers: config.default_headers.clone(),
            timeout: config.timeout,
            http: reqwest::Client::new(),
        }
    }

    /// Assemble the request for `call` without sending it.
    pub fn build_request(&self, call: &ApiCall) -> Result<HttpRequest, RequestError> {
        let mut url = resolve_url(&self.base_url, &call.path)?;
        if !call.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &call.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(HttpRequest {
            method: call.method,
            url: url.to_string(),
            headers: merge_headers(&self.default_headers, &call.options.headers),
            body: call.wire_body().map(str::to_string),
        })
    }

    /// Settle a received response: decode the body, then check the status.
    pub fn parse_response(response: HttpResponse) -> Result<Value, RequestError> {
        let body = decode_body(response.content_type(), &response.body);
        settle(response.status, body)
    }

    async fn execute(&self, request: HttpRequest, call: &ApiCall) -> Result<HttpResponse, RequestError> {
        let mut builder = self.http.request(request.method.to_reqwest(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = call.options.timeout.or(self.timeout) {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        // A body that fails mid-read is treated like an unparsable one.
        let body = match response.bytes().await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "failed to read response body");
                String::new()
            }
        };

        Ok(HttpResponse { status, headers, body })
    }
}

#[async_trait]
impl Transport for FetchTransport {
    async fn send(&self, call: ApiCall) -> Result<Value, RequestError> {
        let request = self.build_request(&call)?;
        let response = with_signal(call.options.signal.as_ref(), self.execute(request, &call)).await?;
        Self::parse_response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::options::RequestOptions;
    use serde_json::json;

    fn transport() -> FetchTransport {
        FetchTransport::new(&ClientConfig::new("http://localhost:8081/"))
    }

    fn response(status: u16, content_type: &str, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_appends_query_and_drops_body() {
        let call = ApiCall::new(HttpMethod::Get, "/todos")
            .query(vec![
                ("completed".to_string(), "true".to_string()),
                ("q".to_string(), "buy milk & eggs".to_string()),
            ])
            .body(Some("{}".to_string()));
        let req = transport().build_request(&call).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8081/todos?completed=true&q=buy+milk+%26+eggs");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_without_query_leaves_url_bare() {
        let req = transport().build_request(&ApiCall::new(HttpMethod::Delete, "todos/1")).unwrap();
        assert_eq!(req.url, "http://localhost:8081/todos/1");
    }

    #[test]
    fn build_post_carries_json_body_and_default_header() {
        let call = ApiCall::new(HttpMethod::Post, "/todos").body(Some(r#"{"title":"Buy milk"}"#.to_string()));
        let req = transport().build_request(&call).unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"title":"Buy milk"}"#));
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn build_merges_caller_headers_over_defaults() {
        let options = RequestOptions::new()
            .header("Content-Type", "text/plain")
            .header("authorization", "Bearer t");
        let call = ApiCall::new(HttpMethod::Put, "/todos/1").options(options);
        let req = transport().build_request(&call).unwrap();
        assert_eq!(
            req.headers,
            vec![
                ("Content-Type".to_string(), "text/plain".to_string()),
                ("authorization".to_string(), "Bearer t".to_string()),
            ]
        );
    }

    #[test]
    fn parse_not_found_exposes_status_and_body() {
        let err = FetchTransport::parse_response(response(404, "application/json", r#"{"message":"not found"}"#))
            .unwrap_err();
        let http = err.as_http().unwrap();
        assert_eq!(http.status, 404);
        assert_eq!(http.body, json!({"message": "not found"}));
    }

    #[test]
    fn parse_text_success_returns_raw_text() {
        let value = FetchTransport::parse_response(response(200, "text/plain; charset=utf-8", "hello")).unwrap();
        assert_eq!(value, json!("hello"));
    }

    #[test]
    fn parse_broken_json_yields_null() {
        let value = FetchTransport::parse_response(response(200, "application/json", "{oops")).unwrap();
        assert_eq!(value, Value::Null);

        let err = FetchTransport::parse_response(response(500, "application/json", "{oops")).unwrap_err();
        assert_eq!(err.as_http().unwrap().body, Value::Null);
    }
}
