//! SeedLink station catalog exchange: commands, parsers and state machine.
//!
//! This crate is transport-independent. It knows how to normalize a
//! `host[:port]` token, how to slice a fixed-column catalog line, and how to
//! decide from accumulated bytes when the HELLO/CAT exchange is complete.
//! Driving a socket is left to the client crate.

pub mod command;
pub mod endpoint;
pub mod error;
pub mod exchange;
pub mod station;

pub use command::Command;
pub use endpoint::{DEFAULT_PORT, ServerEndpoint};
pub use error::{EndpointError, ProbeError, Result};
pub use exchange::{CatalogExchange, CatalogOutcome, ExchangeState, Step};
pub use station::StationRecord;
