use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use seedlink_probe_protocol::Command;
use seedlink_probe_protocol::command::CAT_NOT_IMPLEMENTED;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::OwnedWriteHalf;

/// How the mock answers CAT (and whether it answers at all).
#[derive(Clone, Debug)]
pub enum MockReply {
    Catalog(Vec<String>),
    CatNotImplemented,
    /// Never writes anything.
    Silent,
    /// Answers HELLO, ignores CAT.
    StallAfterHello,
    /// Answers HELLO, closes on CAT.
    CloseAfterHello,
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub hello_line1: String,
    pub hello_line2: String,
    pub reply: MockReply,
    /// Split every write into chunks of this many bytes.
    pub chunk_size: Option<usize>,
}

impl MockConfig {
    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            hello_line1: "SeedLink v3.1 (2020.075)".to_owned(),
            hello_line2: "Mock Server".to_owned(),
            reply,
            chunk_size: None,
        }
    }

    pub fn catalog(lines: &[&str]) -> Self {
        Self::with_reply(MockReply::Catalog(
            lines.iter().map(|l| (*l).to_owned()).collect(),
        ))
    }
}

pub struct MockServer {
    addr: SocketAddr,
    accepted: Arc<AtomicUsize>,
    commands: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    pub async fn start(config: MockConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let commands = Arc::new(Mutex::new(Vec::new()));

        let config = Arc::new(config);
        let counter = accepted.clone();
        let log = commands.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(Self::handle_connection(stream, config.clone(), log.clone()));
            }
        });

        Self {
            addr,
            accepted,
            commands,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Number of TCP connections accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// Command keywords received so far, across all connections.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    async fn handle_connection(
        stream: tokio::net::TcpStream,
        config: Arc<MockConfig>,
        commands: Arc<Mutex<Vec<String>>>,
    ) {
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let Some(cmd) = Command::parse(&line) else {
                continue;
            };
            commands.lock().unwrap().push(cmd.as_str().to_owned());

            let reply = match (cmd, &config.reply) {
                (_, MockReply::Silent) => continue,
                (Command::Hello, _) => {
                    format!("{}\r\n{}\r\n", config.hello_line1, config.hello_line2)
                }
                (Command::Cat, MockReply::Catalog(lines)) => format!("{}\nEND", lines.join("\n")),
                (Command::Cat, MockReply::CatNotImplemented) => CAT_NOT_IMPLEMENTED.to_owned(),
                (Command::Cat, MockReply::StallAfterHello) => continue,
                (Command::Cat, MockReply::CloseAfterHello) => break,
            };
            if write_chunked(&mut write_half, reply.as_bytes(), config.chunk_size)
                .await
                .is_err()
            {
                break;
            }
        }
    }
}

async fn write_chunked(
    writer: &mut OwnedWriteHalf,
    data: &[u8],
    chunk_size: Option<usize>,
) -> std::io::Result<()> {
    let size = chunk_size.unwrap_or(data.len()).max(1);
    for chunk in data.chunks(size) {
        writer.write_all(chunk).await?;
        writer.flush().await?;
        if chunk_size.is_some() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
    Ok(())
}
