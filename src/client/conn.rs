//! Per-worker reusable connections and the request pipeline.
//!
//! The backend drops idle connections server-side, so a handle is only
//! reused within a fixed time-to-live and recreated past it. Handles are
//! keyed by an explicit worker name; nothing here relies on ambient thread
//! identity.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};

use crate::error::{Error, ErrorKind, GENERIC_FAILURE};

/// Maximum age of a connection handle before it is discarded and recreated.
pub const CONNECTION_TIME_TO_LIVE: Duration = Duration::from_secs(600);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A reusable HTTP client bound to one worker, stamped with its creation
/// time.
///
/// Cloning is cheap and shares the underlying client; the clone keeps the
/// original creation timestamp, so age checks agree across clones.
#[derive(Clone, Debug)]
pub struct ConnectionHandle {
    client: Client,
    created_at: Instant,
}

impl ConnectionHandle {
    fn new() -> Self {
        Self {
            client: Client::new(),
            created_at: Instant::now(),
        }
    }

    /// When this handle was created.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// How long this handle has existed.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    fn expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }

    /// Issue a request and return the completed response.
    ///
    /// Only GET and POST are used by the backend. Network-level failures
    /// (timeout, connection refused) propagate unchanged as
    /// [`Error::Http`]; no retrying, no swallowing.
    pub async fn perform(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<String>,
        timeout: Duration,
    ) -> Result<RawResponse, Error> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .headers(headers)
            .timeout(timeout);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        tracing::debug!(%method, url, %status, "request completed");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Status, headers and raw body of a completed request.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body's `message` field, or `fallback` when the body is not JSON
    /// or carries no such field.
    pub(crate) fn message_or(&self, fallback: &str) -> String {
        serde_json::from_str::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Map a non-success response to the error kind declared at the call site.
///
/// Pure: same input, same outcome. On success the response passes through
/// unchanged; on failure the returned error carries the backend's `message`
/// field, or a generic fallback when absent or unparsable.
pub fn check_status(response: RawResponse, kind: ErrorKind) -> Result<RawResponse, Error> {
    if response.is_success() {
        return Ok(response);
    }
    Err(kind.with_message(response.message_or(GENERIC_FAILURE)))
}

/// Hands out one reusable connection handle per worker.
///
/// `acquire` returns the worker's current handle until it outlives the
/// time-to-live, then replaces it. Handles are never shared across
/// workers, so no cross-worker coordination exists beyond the map lock.
#[derive(Debug)]
pub struct ConnectionManager {
    ttl: Duration,
    handles: Mutex<HashMap<String, ConnectionHandle>>,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager {
    /// Create a manager with the default time-to-live.
    pub fn new() -> Self {
        Self::with_ttl(CONNECTION_TIME_TO_LIVE)
    }

    /// Create a manager with a custom time-to-live.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Return the worker's handle, creating a fresh one if none exists or
    /// the existing one has outlived the time-to-live.
    pub fn acquire(&self, worker: &str) -> ConnectionHandle {
        let mut handles = self.handles.lock().unwrap_or_else(|e| e.into_inner());
        match handles.get(worker) {
            Some(handle) if !handle.expired(self.ttl) => return handle.clone(),
            Some(_) => tracing::debug!(worker, "connection handle expired, recreating"),
            None => {}
        }
        let handle = ConnectionHandle::new();
        handles.insert(worker.to_string(), handle.clone());
        handle
    }

    /// Discard the worker's handle and hand out a fresh one regardless of
    /// age.
    pub fn reset(&self, worker: &str) -> ConnectionHandle {
        let handle = ConnectionHandle::new();
        self.handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(worker.to_string(), handle.clone());
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.to_string(),
        }
    }

    // ========================================================================
    // ConnectionManager tests
    // ========================================================================

    #[test]
    fn test_acquire_reuses_handle_within_ttl() {
        let manager = ConnectionManager::new();
        let first = manager.acquire("worker-1");
        let second = manager.acquire("worker-1");
        assert_eq!(first.created_at(), second.created_at());
    }

    #[test]
    fn test_acquire_recreates_expired_handle() {
        let manager = ConnectionManager::with_ttl(Duration::ZERO);
        let first = manager.acquire("worker-1");
        std::thread::sleep(Duration::from_millis(5));
        let second = manager.acquire("worker-1");
        assert!(second.created_at() > first.created_at());
    }

    #[test]
    fn test_workers_get_independent_handles() {
        let manager = ConnectionManager::new();
        let a = manager.acquire("worker-a");
        let b = manager.acquire("worker-b");
        // Separate creations; reuse stays per-worker.
        assert_eq!(a.created_at(), manager.acquire("worker-a").created_at());
        assert_eq!(b.created_at(), manager.acquire("worker-b").created_at());
    }

    #[test]
    fn test_reset_replaces_handle_regardless_of_age() {
        let manager = ConnectionManager::new();
        let first = manager.acquire("worker-1");
        std::thread::sleep(Duration::from_millis(5));
        let fresh = manager.reset("worker-1");
        assert!(fresh.created_at() > first.created_at());
        assert_eq!(fresh.created_at(), manager.acquire("worker-1").created_at());
    }

    // ========================================================================
    // check_status tests
    // ========================================================================

    #[test]
    fn test_check_status_passes_success_through() {
        let raw = response(200, r#"{"token":"T1"}"#);
        let passed = check_status(raw, ErrorKind::Authentication).unwrap();
        assert_eq!(passed.body, r#"{"token":"T1"}"#);
    }

    #[test]
    fn test_check_status_maps_declared_kind_with_message() {
        let raw = response(400, r#"{"message":"too soon"}"#);
        let err = check_status(raw, ErrorKind::CollectTimedBonus).unwrap_err();
        assert!(matches!(err, Error::CollectTimedBonus(m) if m == "too soon"));
    }

    #[test]
    fn test_check_status_falls_back_when_message_absent() {
        let raw = response(500, r#"{"code":13}"#);
        let err = check_status(raw, ErrorKind::LootBox).unwrap_err();
        assert!(matches!(err, Error::LootBox(m) if m == "Unknown"));
    }

    #[test]
    fn test_check_status_falls_back_on_unparsable_body() {
        let raw = response(502, "<html>bad gateway</html>");
        let err = check_status(raw, ErrorKind::FriendRequest).unwrap_err();
        assert!(matches!(err, Error::FriendRequest(m) if m == "Unknown"));
    }

    #[test]
    fn test_check_status_ignores_non_string_message() {
        let raw = response(400, r#"{"message":42}"#);
        let err = check_status(raw, ErrorKind::SignUp).unwrap_err();
        assert!(matches!(err, Error::SignUp(m) if m == "Unknown"));
    }
}
