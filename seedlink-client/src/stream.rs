use futures_core::Stream;
use seedlink_probe_protocol::ServerEndpoint;

use crate::orchestrator::Orchestrator;
use crate::result::QueryResult;

/// Resolve `endpoints` sequentially through `orchestrator`, in input order.
///
/// Each item is yielded as soon as its cache lookup or session completes.
/// The stream ends after the last endpoint.
pub fn result_stream(
    orchestrator: &Orchestrator,
    endpoints: Vec<ServerEndpoint>,
) -> impl Stream<Item = QueryResult> + '_ {
    async_stream::stream! {
        for endpoint in endpoints {
            yield orchestrator.resolve(&endpoint).await;
        }
    }
}
