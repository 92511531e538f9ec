use std::time::{SystemTime, UNIX_EPOCH};

use seedlink_probe_protocol::{CatalogOutcome, ProbeError, ServerEndpoint, StationRecord};
use serde::{Serialize, Serializer};
use tokio::time::Instant;

/// Outcome of probing one server, fresh or served from cache.
///
/// Serializes with camelCase field names; `requestedAt` is Unix milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub endpoint: ServerEndpoint,
    /// Catalog in response order. Empty whenever `error` is set.
    pub stations: Vec<StationRecord>,
    pub error: Option<ProbeError>,
    /// First HELLO line.
    pub protocol_version: Option<String>,
    /// Second HELLO line.
    pub server_identifier: Option<String>,
    /// True once any data arrived from the server, whatever the final outcome.
    pub connected: bool,
    #[serde(serialize_with = "unix_millis")]
    pub requested_at: SystemTime,
    /// Monotonic twin of `requested_at`, used for cache expiry.
    #[serde(skip)]
    pub(crate) started: Instant,
}

impl QueryResult {
    pub(crate) fn from_outcome(
        endpoint: ServerEndpoint,
        requested_at: SystemTime,
        started: Instant,
        connected: bool,
        outcome: CatalogOutcome,
    ) -> Self {
        let stations = if outcome.error.is_some() {
            Vec::new()
        } else {
            outcome.stations
        };
        Self {
            endpoint,
            stations,
            error: outcome.error,
            protocol_version: outcome.protocol_version,
            server_identifier: outcome.server_identifier,
            connected,
            requested_at,
            started,
        }
    }

    /// True when the handshake and catalog were both received.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Time since the probe that produced this result started.
    pub fn age(&self) -> std::time::Duration {
        Instant::now().saturating_duration_since(self.started)
    }
}

fn unix_millis<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    let millis = time
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    serializer.serialize_u64(u64::try_from(millis).unwrap_or(u64::MAX))
}

#[cfg(test)]
pub(crate) fn sample(key_host: &str, port: u16, error: Option<ProbeError>) -> QueryResult {
    let outcome = CatalogOutcome {
        protocol_version: Some("SeedLink v3.1".into()),
        server_identifier: Some("Mock".into()),
        stations: vec![StationRecord::parse_line("IU ANMO  Albuquerque")],
        error,
    };
    QueryResult::from_outcome(
        ServerEndpoint::new(key_host, port),
        SystemTime::now(),
        Instant::now(),
        true,
        outcome,
    )
}
