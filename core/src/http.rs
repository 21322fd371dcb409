//! HTTP data types and the helpers both transports share.
//!
//! # Design
//! `HttpRequest` and `HttpResponse` describe an exchange as plain data. The
//! fetch transport builds and parses them with pure functions and only
//! touches the network in between, so the interesting behavior (URL and
//! query construction, header merging, body sniffing) is testable without a
//! server.
//!
//! The free functions at the bottom are the single canonical rendition of
//! query stringification, header merging and response body decoding. Both
//! transports call them, so a call behaves the same whichever transport
//! backs the client.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{HttpError, RequestError};

/// Default `content-type` sent with every request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The five verbs exposed by the request wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a request body may be attached for this verb.
    pub fn allows_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// `body` holds the response text; bytes that are not valid UTF-8 are
/// replaced, the way a browser decodes a text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup; returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or("")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Flatten query parameters into ordered `(key, value)` pairs.
///
/// `params` must serialize to a JSON object (or to `null`, meaning no
/// parameters). Null entries are skipped. Strings are taken verbatim,
/// numbers and booleans use their JSON spelling, and arrays repeat the key
/// once per non-null element. Nested objects are rejected.
pub fn query_pairs<P: Serialize + ?Sized>(params: &P) -> Result<Vec<(String, String)>, RequestError> {
    let value = serde_json::to_value(params).map_err(|e| RequestError::InvalidParams(e.to_string()))?;
    let map = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(RequestError::InvalidParams(format!(
                "query parameters must be an object, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_to_string(&key, item)? {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_to_string(&key, other)? {
                    pairs.push((key, text));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar_to_string(key: &str, value: Value) -> Result<Option<String>, RequestError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        // Integral floats drop the fraction: `1.0` is sent as `1`.
        Value::Number(n) => Ok(Some(match n.as_f64().filter(|_| n.is_f64()) {
            Some(f) => f.to_string(),
            None => n.to_string(),
        })),
        other => Err(RequestError::InvalidParams(format!(
            "query parameter `{key}` must be a scalar, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Merge `overrides` over `defaults`, comparing names case-insensitively.
///
/// An override replaces every default with the same name and takes the
/// default's position; new names are appended in order.
pub fn merge_headers(defaults: &[(String, String)], overrides: &[(String, String)]) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = Vec::with_capacity(defaults.len() + overrides.len());
    for (name, value) in defaults.iter().chain(overrides) {
        match merged.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(name)) {
            Some(slot) => *slot = (name.clone(), value.clone()),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}

/// Best-effort decode of a response body.
///
/// A JSON content type is parsed as JSON and anything else is offered as a
/// JSON string, empty text included. Unparsable JSON becomes `null`, as does
/// an empty body with no declared content type (a bare `204`).
pub fn decode_body(content_type: &str, body: &str) -> Value {
    let content_type = content_type.trim();
    if content_type.to_ascii_lowercase().contains(JSON_CONTENT_TYPE) {
        serde_json::from_str(body).unwrap_or(Value::Null)
    } else if body.is_empty() && content_type.is_empty() {
        Value::Null
    } else {
        Value::String(body.to_string())
    }
}

/// Turn a decoded body and its status into the call's outcome.
pub fn settle(status: u16, body: Value) -> Result<Value, RequestError> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(RequestError::Http(HttpError::new(status, body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Search<'a> {
        q: &'a str,
        page: u32,
        tag: Option<&'a str>,
        active: bool,
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn query_pairs_skips_none_and_keeps_field_order() {
        let params = Search {
            q: "rust",
            page: 2,
            tag: None,
            active: true,
        };
        let result = query_pairs(&params).unwrap();
        assert_eq!(result, pairs(&[("q", "rust"), ("page", "2"), ("active", "true")]));
    }

    #[test]
    fn query_pairs_skips_json_nulls() {
        let result = query_pairs(&json!({"a": null, "b": 1.5, "c": "x"})).unwrap();
        assert_eq!(result, pairs(&[("b", "1.5"), ("c", "x")]));
    }

    #[test]
    fn query_pairs_unit_means_no_params() {
        assert!(query_pairs(&()).unwrap().is_empty());
        assert!(query_pairs(&None::<Search>).unwrap().is_empty());
    }

    #[test]
    fn query_pairs_repeats_array_keys() {
        let result = query_pairs(&json!({"id": [1, null, 3]})).unwrap();
        assert_eq!(result, pairs(&[("id", "1"), ("id", "3")]));
    }

    #[test]
    fn query_pairs_rejects_nested_objects() {
        let err = query_pairs(&json!({"filter": {"a": 1}})).unwrap_err();
        assert!(matches!(err, RequestError::InvalidParams(msg) if msg.contains("filter")));
    }

    #[test]
    fn query_pairs_rejects_non_objects() {
        let err = query_pairs(&vec![1, 2]).unwrap_err();
        assert!(matches!(err, RequestError::InvalidParams(_)));
    }

    #[test]
    fn merge_headers_overrides_case_insensitively() {
        let defaults = pairs(&[("content-type", "application/json"), ("x-app", "web")]);
        let overrides = pairs(&[("Content-Type", "text/plain"), ("x-trace", "1")]);
        let merged = merge_headers(&defaults, &overrides);
        assert_eq!(
            merged,
            pairs(&[("Content-Type", "text/plain"), ("x-app", "web"), ("x-trace", "1")])
        );
    }

    #[test]
    fn decode_body_parses_json_content_type() {
        let body = decode_body("application/json; charset=utf-8", r#"{"message":"not found"}"#);
        assert_eq!(body, json!({"message": "not found"}));
    }

    #[test]
    fn decode_body_returns_text_for_other_content_types() {
        assert_eq!(decode_body("text/plain", "hello"), json!("hello"));
        assert_eq!(decode_body("", "{\"a\":1}"), json!("{\"a\":1}"));
    }

    #[test]
    fn decode_body_degrades_broken_json_to_null() {
        assert_eq!(decode_body("application/json", "{not json"), Value::Null);
    }

    #[test]
    fn decode_body_empty_text_stays_text() {
        assert_eq!(decode_body("text/plain; charset=utf-8", ""), json!(""));
        let text: String = serde_json::from_value(decode_body("text/plain", "")).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn decode_body_empty_without_content_type_or_json_is_null() {
        assert_eq!(decode_body("", ""), Value::Null);
        assert_eq!(decode_body("application/json", ""), Value::Null);
    }

    #[test]
    fn query_pairs_writes_integral_floats_without_fraction() {
        let result = query_pairs(&json!({"a": 1.0, "b": 2.5, "c": -3.0, "d": 7})).unwrap();
        assert_eq!(result, pairs(&[("a", "1"), ("b", "2.5"), ("c", "-3"), ("d", "7")]));
    }

    #[test]
    fn settle_maps_status_to_outcome() {
        assert_eq!(settle(204, Value::Null).unwrap(), Value::Null);
        let err = settle(404, json!({"message": "not found"})).unwrap_err();
        match err {
            RequestError::Http(e) => {
                assert_eq!(e.status, 404);
                assert_eq!(e.body, json!({"message": "not found"}));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            headers: pairs(&[("Content-Type", "text/plain")]),
            body: String::new(),
        };
        assert_eq!(response.content_type(), "text/plain");
        assert!(response.is_success());
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn only_get_forbids_body() {
        assert!(!HttpMethod::Get.allows_body());
        assert!(HttpMethod::Delete.allows_body());
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }
}
