use serde::Serialize;

/// Errors raised synchronously while validating caller input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("invalid port in {token:?}: {port} is outside 0..65536")]
    InvalidPort { token: String, port: i64 },

    #[error("no server endpoints given")]
    EmptyQuery,
}

pub type Result<T> = std::result::Result<T, EndpointError>;

/// Failure recorded on a probe result.
///
/// These never propagate as `Err`; one failing server must not abort the
/// probes of its siblings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ProbeError {
    /// Connect failure, socket error, early EOF, or idle timeout.
    #[serde(rename = "ECONNREFUSED")]
    ConnectionRefused,
    /// The server answered HELLO but rejected CAT.
    #[serde(rename = "CATNOTIMPLEMENTED")]
    CatNotImplemented,
}

impl ProbeError {
    /// Wire/JSON representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectionRefused => "ECONNREFUSED",
            Self::CatNotImplemented => "CATNOTIMPLEMENTED",
        }
    }
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
