use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tracing::{trace, warn};

use crate::result::QueryResult;

/// Most recent successful probe per endpoint key, with lazy expiry.
///
/// Entries are never swept: an expired entry is ignored by
/// [`lookup`](Self::lookup) and replaced by the next successful
/// [`put`](Self::put) for the same key.
#[derive(Debug)]
pub struct StationCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, QueryResult>>,
}

impl StationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the entry for `key` if it is younger than the TTL.
    pub fn lookup(&self, key: &str) -> Option<QueryResult> {
        let entries = self.lock();
        let entry = entries.get(key)?;
        let age = entry.age();
        if age < self.ttl {
            trace!(key, ?age, "cache hit");
            Some(entry.clone())
        } else {
            trace!(key, ?age, "cache entry expired");
            None
        }
    }

    /// Store `result` under its endpoint key, replacing any previous entry.
    ///
    /// Failed results are dropped: only successful probes are cached, so a
    /// failing server is probed again on the next request.
    pub fn put(&self, result: QueryResult) {
        if let Some(error) = result.error {
            warn!(key = result.endpoint.key(), %error, "refusing to cache failed probe");
            return;
        }
        let key = result.endpoint.key().to_owned();
        self.lock().insert(key, result);
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, QueryResult>> {
        // Poisoning is ignored; the map is only touched by single get/insert calls.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
