//! Per-call options.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Options accepted by every verb in addition to its path and payload.
///
/// ```
/// use api_request::RequestOptions;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let options = RequestOptions::new()
///     .header("x-request-id", "42")
///     .signal(token.clone());
/// assert_eq!(options.headers.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Merged over the client's default headers; these win on conflict.
    pub headers: Vec<(String, String)>,
    /// Cancelling the token aborts the in-flight request.
    pub signal: Option<CancellationToken>,
    /// Replaces the configured timeout for this call only.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn signal(mut self, token: CancellationToken) -> Self {
        self.signal = Some(token);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
