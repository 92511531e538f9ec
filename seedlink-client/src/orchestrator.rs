use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_core::Stream;
use seedlink_probe_protocol::{CatalogOutcome, ProbeError, ServerEndpoint};
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::StationCache;
use crate::config::ProbeConfig;
use crate::error::Result;
use crate::result::QueryResult;
use crate::session;

/// Answers catalog queries for a list of servers, cache first.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> seedlink_probe_client::Result<()> {
/// use seedlink_probe_client::{Orchestrator, ProbeConfig};
///
/// let orchestrator = Orchestrator::new(ProbeConfig::default());
/// let results = orchestrator
///     .query_tokens("rtserve.iris.washington.edu,geofon.gfz-potsdam.de:18000")
///     .await?;
/// for result in &results {
///     println!("{}: {} stations", result.endpoint, result.stations.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator {
    config: ProbeConfig,
    cache: Arc<StationCache>,
}

impl Orchestrator {
    /// Create an orchestrator with its own cache.
    pub fn new(config: ProbeConfig) -> Self {
        let cache = Arc::new(StationCache::new(config.cache_ttl));
        Self { config, cache }
    }

    /// Create an orchestrator over an existing, possibly shared, cache.
    ///
    /// The cache keeps its own TTL; `config.cache_ttl` is not applied to it.
    pub fn with_cache(config: ProbeConfig, cache: Arc<StationCache>) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<StationCache> {
        &self.cache
    }

    /// Parse a comma-delimited `host[:port]` list and query it.
    ///
    /// Invalid input fails before any connection is opened.
    pub async fn query_tokens(&self, query: &str) -> Result<Vec<QueryResult>> {
        let endpoints = ServerEndpoint::parse_list_with_default(query, self.config.default_port)?;
        Ok(self.query(&endpoints).await)
    }

    /// Return one result per endpoint, in input order.
    ///
    /// Each distinct key is resolved once per call: from the cache when a
    /// fresh entry exists, otherwise by a new session. Duplicate endpoints
    /// share that single result. Sessions run with at most
    /// `max_concurrent_probes` in flight; successful ones are cached.
    pub async fn query(&self, endpoints: &[ServerEndpoint]) -> Vec<QueryResult> {
        let mut resolved: HashMap<String, QueryResult> = HashMap::new();
        let mut seen = HashSet::new();
        let mut misses = Vec::new();

        for endpoint in endpoints {
            if !seen.insert(endpoint.key()) {
                continue;
            }
            match self.cache.lookup(endpoint.key()) {
                Some(hit) => {
                    debug!(endpoint = %endpoint, "served from cache");
                    resolved.insert(endpoint.key().to_owned(), hit);
                }
                None => misses.push(endpoint.clone()),
            }
        }

        info!(
            requested = endpoints.len(),
            cached = resolved.len(),
            probing = misses.len(),
            "query"
        );

        for result in self.probe_all(misses).await {
            if result.is_success() {
                self.cache.put(result.clone());
            }
            resolved.insert(result.endpoint.key().to_owned(), result);
        }

        endpoints
            .iter()
            .filter_map(|endpoint| resolved.get(endpoint.key()).cloned())
            .collect()
    }

    /// Resolve endpoints one at a time, yielding each result as it is ready.
    ///
    /// Unlike [`query`](Self::query) a duplicate endpoint whose first probe
    /// failed is probed again, since nothing was cached for it.
    pub fn query_stream(
        &self,
        endpoints: Vec<ServerEndpoint>,
    ) -> impl Stream<Item = QueryResult> + '_ {
        crate::stream::result_stream(self, endpoints)
    }

    /// Cache lookup, falling back to a session whose success is cached.
    pub async fn resolve(&self, endpoint: &ServerEndpoint) -> QueryResult {
        if let Some(hit) = self.cache.lookup(endpoint.key()) {
            debug!(endpoint = %endpoint, "served from cache");
            return hit;
        }
        let result = session::probe(endpoint.clone(), self.config.idle_timeout).await;
        if result.is_success() {
            self.cache.put(result.clone());
        }
        result
    }

    async fn probe_all(&self, endpoints: Vec<ServerEndpoint>) -> Vec<QueryResult> {
        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_probes.max(1)));
        let idle_timeout = self.config.idle_timeout;

        let handles: Vec<_> = endpoints
            .iter()
            .cloned()
            .map(|endpoint| {
                let permits = permits.clone();
                tokio::spawn(async move {
                    let _permit = permits.acquire_owned().await.ok();
                    session::probe(endpoint, idle_timeout).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (endpoint, handle) in endpoints.into_iter().zip(handles) {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "probe task failed");
                    results.push(aborted(endpoint));
                }
            }
        }
        results
    }
}

fn aborted(endpoint: ServerEndpoint) -> QueryResult {
    let outcome = CatalogOutcome {
        error: Some(ProbeError::ConnectionRefused),
        ..CatalogOutcome::default()
    };
    QueryResult::from_outcome(
        endpoint,
        std::time::SystemTime::now(),
        Instant::now(),
        false,
        outcome,
    )
}
