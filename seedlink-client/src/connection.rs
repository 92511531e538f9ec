use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace, warn};

use crate::error::{ClientError, Result};

/// Size of a single socket read.
pub const READ_CHUNK: usize = 4096;

/// TCP connection where every operation shares one idle timeout.
pub struct Connection {
    stream: TcpStream,
    idle_timeout: Duration,
}

impl Connection {
    pub async fn connect(addr: &str, idle_timeout: Duration) -> Result<Self> {
        debug!(addr, "TCP connecting");
        let stream = tokio::time::timeout(idle_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| ClientError::Timeout(idle_timeout))?
            .map_err(ClientError::Io)?;

        stream.set_nodelay(true).ok();

        Ok(Self {
            stream,
            idle_timeout,
        })
    }

    pub async fn send_raw(&mut self, data: &[u8]) -> Result<()> {
        trace!(len = data.len(), "sending");
        tokio::time::timeout(self.idle_timeout, self.stream.write_all(data))
            .await
            .map_err(|_| ClientError::Timeout(self.idle_timeout))?
            .map_err(ClientError::Io)?;
        Ok(())
    }

    /// Read whatever is available into `buf`.
    ///
    /// Fails with [`ClientError::Timeout`] if nothing arrives within the idle
    /// timeout and with [`ClientError::Disconnected`] on EOF.
    pub async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = tokio::time::timeout(self.idle_timeout, self.stream.read(buf))
            .await
            .map_err(|_| {
                warn!(timeout = ?self.idle_timeout, "idle timeout");
                ClientError::Timeout(self.idle_timeout)
            })?
            .map_err(ClientError::Io)?;
        if n == 0 {
            return Err(ClientError::Disconnected);
        }
        trace!(len = n, "received");
        Ok(n)
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.stream.shutdown().await.map_err(ClientError::Io)?;
        Ok(())
    }
}
