use std::time::Duration;

/// Errors that can occur while talking to a SeedLink server or validating input.
///
/// Transport variants stay inside a probe: the session records them as
/// `ECONNREFUSED` on the result. Only [`ClientError::Endpoint`] reaches
/// callers of the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// TCP or socket I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid `host[:port]` input.
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] seedlink_probe_protocol::EndpointError),

    /// No activity within the idle timeout.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// Server closed the connection (read returned 0 bytes).
    #[error("disconnected")]
    Disconnected,
}

/// Convenience alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;
