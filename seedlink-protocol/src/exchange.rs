//! Transport-independent HELLO/CAT exchange.
//!
//! [`CatalogExchange`] owns the receive buffer and decides, from the bytes
//! fed so far, whether the handshake or the catalog is complete. It never
//! touches a socket: the caller writes [`CatalogExchange::greeting`] after
//! connecting, feeds every received chunk to [`CatalogExchange::feed`] and
//! acts on the returned [`Step`].

use crate::command::{CAT_NOT_IMPLEMENTED, CATALOG_TERMINATOR, CRLF, Command};
use crate::error::ProbeError;
use crate::station::StationRecord;

/// Exchange state after the TCP connection is up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExchangeState {
    /// HELLO sent; waiting for the two identification lines.
    AwaitingHello,
    /// CAT sent; collecting catalog lines until `\nEND`.
    AwaitingCatalog,
    /// Terminal. No further I/O.
    Done,
}

impl ExchangeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingHello => "AwaitingHello",
            Self::AwaitingCatalog => "AwaitingCatalog",
            Self::Done => "Done",
        }
    }
}

/// What the driver must do after feeding a chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Write these bytes to the server, then keep reading.
    Send(&'static [u8]),
    /// Keep reading.
    Pending,
    /// The exchange reached `Done`; close the connection.
    Finished(CatalogOutcome),
}

/// Terminal result of one exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogOutcome {
    /// First HELLO line, once received.
    pub protocol_version: Option<String>,
    /// Second HELLO line, once received.
    pub server_identifier: Option<String>,
    /// Catalog entries in response order. Empty whenever `error` is set.
    pub stations: Vec<StationRecord>,
    pub error: Option<ProbeError>,
}

/// Buffer-driven HELLO → CAT state machine.
#[derive(Debug)]
pub struct CatalogExchange {
    state: ExchangeState,
    buffer: Vec<u8>,
    protocol_version: Option<String>,
    server_identifier: Option<String>,
    connected: bool,
}

impl Default for CatalogExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogExchange {
    /// Start in `AwaitingHello`. The caller is expected to have sent
    /// [`greeting`](Self::greeting) already.
    pub fn new() -> Self {
        Self {
            state: ExchangeState::AwaitingHello,
            buffer: Vec::new(),
            protocol_version: None,
            server_identifier: None,
            connected: false,
        }
    }

    /// Bytes to write right after the TCP connection opens.
    pub fn greeting() -> &'static [u8] {
        Command::Hello.to_bytes()
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// True once any data has been received.
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Feed one received chunk.
    ///
    /// Chunks fed after `Done` are ignored and yield [`Step::Pending`].
    pub fn feed(&mut self, chunk: &[u8]) -> Step {
        if self.state == ExchangeState::Done || chunk.is_empty() {
            return Step::Pending;
        }
        self.connected = true;
        self.buffer.extend_from_slice(chunk);

        match self.state {
            ExchangeState::AwaitingHello => self.try_complete_hello(),
            ExchangeState::AwaitingCatalog => self.try_complete_catalog(),
            ExchangeState::Done => Step::Pending,
        }
    }

    /// Force `Done` with `error` from any state (idle timeout, socket error).
    ///
    /// Returns `None` if the exchange had already finished.
    pub fn fail(&mut self, error: ProbeError) -> Option<CatalogOutcome> {
        if self.state == ExchangeState::Done {
            return None;
        }
        Some(self.finish(Vec::new(), Some(error)))
    }

    // Complete exactly when the text splits on CRLF into two lines plus the
    // empty tail left by the final terminator.
    fn try_complete_hello(&mut self) -> Step {
        let text = String::from_utf8_lossy(&self.buffer);
        let parts: Vec<&str> = text.split(CRLF).collect();
        if parts.len() != 3 {
            return Step::Pending;
        }
        self.protocol_version = Some(parts[0].to_owned());
        self.server_identifier = Some(parts[1].to_owned());
        self.buffer.clear();
        self.state = ExchangeState::AwaitingCatalog;
        Step::Send(Command::Cat.to_bytes())
    }

    fn try_complete_catalog(&mut self) -> Step {
        if self.buffer == CAT_NOT_IMPLEMENTED.as_bytes() {
            let outcome = self.finish(Vec::new(), Some(ProbeError::CatNotImplemented));
            return Step::Finished(outcome);
        }
        if !self.buffer.ends_with(CATALOG_TERMINATOR) {
            return Step::Pending;
        }
        let body = &self.buffer[..self.buffer.len() - CATALOG_TERMINATOR.len()];
        let stations = String::from_utf8_lossy(body)
            .split('\n')
            .map(StationRecord::parse_line)
            .collect();
        Step::Finished(self.finish(stations, None))
    }

    fn finish(
        &mut self,
        stations: Vec<StationRecord>,
        error: Option<ProbeError>,
    ) -> CatalogOutcome {
        self.state = ExchangeState::Done;
        self.buffer.clear();
        CatalogOutcome {
            protocol_version: self.protocol_version.clone(),
            server_identifier: self.server_identifier.clone(),
            stations,
            error,
        }
    }
}
