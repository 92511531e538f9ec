//! Async SeedLink station catalog probe.
//!
//! Connects to SeedLink servers (IRIS, GEOFON, BMKG, etc.), performs the
//! HELLO/CAT exchange and returns each server's station catalog. Successful
//! results are cached per server for a configurable time.

pub mod cache;
pub mod config;
pub(crate) mod connection;
pub mod error;
#[cfg(test)]
pub(crate) mod mock;
pub mod orchestrator;
pub mod result;
pub mod session;
pub(crate) mod stream;

pub use cache::StationCache;
pub use config::ProbeConfig;
pub use error::{ClientError, Result};
pub use orchestrator::Orchestrator;
pub use result::QueryResult;
pub use seedlink_probe_protocol::{EndpointError, ProbeError, ServerEndpoint, StationRecord};
pub use session::probe;
