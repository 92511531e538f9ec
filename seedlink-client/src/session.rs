//! One HELLO → CAT exchange over TCP.

use std::time::{Duration, SystemTime};

use seedlink_probe_protocol::{CatalogExchange, CatalogOutcome, ProbeError, ServerEndpoint, Step};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::connection::{Connection, READ_CHUNK};
use crate::error::Result;
use crate::result::QueryResult;

/// Probe one server and return its catalog.
///
/// Never fails: connect errors, socket errors, an early close and the idle
/// timeout all end up as [`ProbeError::ConnectionRefused`] on the result.
/// The connection is closed before this returns, whatever the outcome.
pub async fn probe(endpoint: ServerEndpoint, idle_timeout: Duration) -> QueryResult {
    let requested_at = SystemTime::now();
    let started = Instant::now();
    info!(endpoint = %endpoint, "probing");

    let mut exchange = CatalogExchange::new();
    let outcome = match run(&endpoint, idle_timeout, &mut exchange).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(
                endpoint = %endpoint,
                state = exchange.state().as_str(),
                error = %e,
                "probe failed"
            );
            exchange
                .fail(ProbeError::ConnectionRefused)
                .unwrap_or_default()
        }
    };

    match outcome.error {
        None => info!(
            endpoint = %endpoint,
            stations = outcome.stations.len(),
            elapsed = ?started.elapsed(),
            "catalog received"
        ),
        Some(error) => debug!(endpoint = %endpoint, %error, "probe finished with error"),
    }

    QueryResult::from_outcome(endpoint, requested_at, started, exchange.connected(), outcome)
}

async fn run(
    endpoint: &ServerEndpoint,
    idle_timeout: Duration,
    exchange: &mut CatalogExchange,
) -> Result<CatalogOutcome> {
    let mut connection = Connection::connect(endpoint.key(), idle_timeout).await?;
    let result = drive(&mut connection, exchange).await;
    connection.shutdown().await.ok();
    result
}

async fn drive(
    connection: &mut Connection,
    exchange: &mut CatalogExchange,
) -> Result<CatalogOutcome> {
    connection.send_raw(CatalogExchange::greeting()).await?;

    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = connection.read_chunk(&mut buf).await?;
        match exchange.feed(&buf[..n]) {
            Step::Pending => {}
            Step::Send(bytes) => {
                debug!(state = exchange.state().as_str(), "handshake complete");
                connection.send_raw(bytes).await?;
            }
            Step::Finished(outcome) => return Ok(outcome),
        }
    }
}
