//! Probe SeedLink servers and print their catalogs as JSON.
//!
//! ```bash
//! cargo run --example probe -p seedlink-probe-client -- rtserve.iris.washington.edu,geofon.gfz-potsdam.de:18000
//!
//! # Verbose, with a short idle timeout and parallel probes
//! RUST_LOG=debug SEEDLINK_PROBE_TIMEOUT_MS=3000 SEEDLINK_PROBE_MAX_CONCURRENT=4 \
//!     cargo run --example probe -p seedlink-probe-client -- host1,host2:18001
//! ```

use seedlink_probe_client::{Orchestrator, ProbeConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "rtserve.iris.washington.edu".to_owned());

    let config = ProbeConfig::from_env();
    tracing::info!(?config, "starting");
    let orchestrator = Orchestrator::new(config);

    let results = match orchestrator.query_tokens(&query).await {
        Ok(results) => results,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    match serde_json::to_string_pretty(&results) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
