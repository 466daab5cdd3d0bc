//! Audit trail entries for mutating authority calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One audit trail entry.
///
/// Appended for every mutating call (POST/PUT/DELETE), success or failure.
/// GET/query calls are excluded from the trail. Entries are append-only and
/// never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the call was made.
    pub at: DateTime<Utc>,

    /// HTTP method.
    pub method: String,

    /// Full request URL.
    pub url: String,

    /// Request payload, when one was sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,

    /// HTTP status of the response, when one arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<u16>,

    /// Response body, when one arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,

    /// Transport-level error, when the call never produced a response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HistoryEntry {
    /// Entry for a call that produced an HTTP response (any status).
    pub fn response(
        method: &str,
        url: &str,
        request_body: Option<&str>,
        status: u16,
        body: &str,
    ) -> Self {
        Self {
            at: Utc::now(),
            method: method.to_string(),
            url: url.to_string(),
            request_body: request_body.map(String::from),
            response_status: Some(status),
            response_body: Some(body.to_string()),
            error: None,
        }
    }

    /// Entry for a call that failed before a response arrived.
    pub fn failure(method: &str, url: &str, request_body: Option<&str>, error: &str) -> Self {
        Self {
            at: Utc::now(),
            method: method.to_string(),
            url: url.to_string(),
            request_body: request_body.map(String::from),
            response_status: None,
            response_body: None,
            error: Some(error.to_string()),
        }
    }
}

/// Destination for audit trail entries.
///
/// The client appends exactly one entry per mutating call through this
/// trait; the store behind it decides how entries are persisted. Appends
/// are best-effort audit, not a transaction log, so the trait is infallible
/// and implementations log their own persistence failures.
pub trait HistorySink: Send + Sync {
    fn append(&self, entry: HistoryEntry);
}

/// In-memory sink, used by tests and by callers without a store.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: std::sync::Mutex<Vec<HistoryEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected entries.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().expect("sink lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("sink lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistorySink for MemorySink {
    fn append(&self, entry: HistoryEntry) {
        self.entries.lock().expect("sink lock poisoned").push(entry);
    }
}
