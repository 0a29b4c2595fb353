//! ## Handles the TCP side of the dispatch server
//!
//! One task accepts connections, and every client gets its own task that reads
//! request lines, runs them against the shared [DispatchStore] and writes one
//! response line back per request.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::config::{self, ServerConfig};
use crate::dispatch::DispatchStore;
use crate::print;

use super::protocol::{self, Response};

/// Creates a non-blocking TCP listener on `addr`, with address reuse enabled.
///
/// Address reuse lets the server come straight back up on the same port after a restart.
///
/// # Errors
/// Fails if socket creation, binding or listening fails.
pub fn create_reusable_listener(addr: SocketAddr) -> Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
        .context("Couldnt create socket")?;
    socket.set_nonblocking(true).context("Couldnt set non blocking")?;
    socket.set_reuse_address(true).context("Couldnt set reuse_address")?;
    socket
        .bind(&addr.into())
        .with_context(|| format!("Couldnt bind the socket to {}", addr))?;
    socket
        .listen(config::LISTEN_BACKLOG)
        .context("Couldnt listen on the socket")?;
    TcpListener::from_std(socket.into()).context("Couldnt create TcpListener")
}

/// What happened to the last read from a client.
enum ReadOutcome {
    /// A line was read (it may be missing its newline if the client closed mid-line)
    Line,
    /// The client closed the connection
    Closed,
    /// The line did not fit in [config::MAX_LINE_LEN]
    TooLong,
}

/// Reads one line into `buf`, never buffering more than [config::MAX_LINE_LEN] bytes.
async fn read_request_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<ReadOutcome>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    buf.clear();
    let n = reader
        .take(config::MAX_LINE_LEN as u64)
        .read_until(b'\n', buf)
        .await?;
    if n == 0 {
        Ok(ReadOutcome::Closed)
    } else if buf.last() != Some(&b'\n') && n >= config::MAX_LINE_LEN {
        Ok(ReadOutcome::TooLong)
    } else {
        Ok(ReadOutcome::Line)
    }
}

/// Serves one client until it disconnects, goes idle, or sends an oversized line.
///
/// A line that cannot be parsed gets a `bad_request` answer, the connection stays open.
async fn handle_client(
    mut stream: TcpStream,
    addr: SocketAddr,
    store: Arc<DispatchStore>,
    idle_timeout: Duration,
) -> Result<()> {
    let (read_half, mut write_half) = stream.split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::with_capacity(256);

    loop {
        let outcome = match timeout(idle_timeout, read_request_line(&mut reader, &mut buf)).await {
            Ok(result) => result.with_context(|| format!("Read from {} failed", addr))?,
            Err(_) => {
                print::warn(format!("Timeout: No request from {} within {:?}", addr, idle_timeout));
                break;
            }
        };

        let response = match outcome {
            ReadOutcome::Closed => break,
            ReadOutcome::TooLong => {
                print::warn(format!("{} sent a line longer than {} bytes", addr, config::MAX_LINE_LEN));
                let resp = Response::bad_request(format!(
                    "request line longer than {} bytes",
                    config::MAX_LINE_LEN
                ));
                write_half.write_all(&protocol::encode_line(&resp)?).await?;
                break;
            }
            ReadOutcome::Line if buf.trim_ascii().is_empty() => continue,
            ReadOutcome::Line => protocol::handle_line(&store, &buf),
        };

        if let Response::Error { message, .. } = &response {
            print::warn(format!("Rejected request from {}: {}", addr, message));
        }
        write_half
            .write_all(&protocol::encode_line(&response)?)
            .await
            .with_context(|| format!("Write to {} failed", addr))?;
    }

    close_stream(&mut write_half, addr).await;
    Ok(())
}

/// Shuts down the write side of a client stream. Returns `false` (after a warning) if that failed.
async fn close_stream<W>(writer: &mut W, addr: SocketAddr) -> bool
where
    W: tokio::io::AsyncWrite + Unpin,
{
    match writer.shutdown().await {
        Ok(()) => true,
        Err(e) => {
            print::warn(format!("Couldnt shut down the stream to {}: {}", addr, e));
            false
        }
    }
}

/// Accepts clients on `listener` until `shutdown_rx` turns `true` or its sender is dropped.
///
/// Every accepted client is served on its own task, sharing `store`.
pub async fn serve(
    listener: TcpListener,
    store: Arc<DispatchStore>,
    idle_timeout: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        print::info(format!("New client connected: {}", addr));
                        let store = Arc::clone(&store);
                        let _client_task: JoinHandle<()> = tokio::spawn(async move {
                            match handle_client(stream, addr, store, idle_timeout).await {
                                Ok(()) => print::info(format!("Client {} disconnected", addr)),
                                Err(e) => print::err(format!("Client {}: {:#}", addr, e)),
                            }
                        });
                    }
                    Err(e) => {
                        print::err(format!("tcp_server.rs, serve(): accept failed: {}", e));
                        tokio::task::yield_now().await;
                    }
                }
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    print::info("Dispatch server shutting down".to_string());
                    break;
                }
            }
        }
    }
    Ok(())
}

/// A running dispatch server.
///
/// Dropping the handle without calling [ServerHandle::shutdown] also stops the accept loop,
/// since the shutdown sender goes away with it.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<Result<()>>,
}

impl ServerHandle {
    /// The address the server actually listens on (useful with port `0`).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting new clients and waits for the accept loop to end.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        self.task.await.context("Server task panicked")?
    }
}

/// Binds the listener described by `cfg` and starts serving `store` on a background task.
///
/// # Errors
/// Fails if the listener cannot be created.
pub async fn spawn_server(cfg: &ServerConfig, store: Arc<DispatchStore>) -> Result<ServerHandle> {
    let listener = create_reusable_listener(cfg.socket_addr())?;
    let local_addr = listener.local_addr().context("Listener has no local address")?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let idle_timeout = cfg.idle_timeout;

    print::ok(format!("Dispatch server listening on {}", local_addr));
    let task = tokio::spawn(serve(listener, store, idle_timeout, shutdown_rx));

    Ok(ServerHandle {
        local_addr,
        shutdown_tx,
        task,
    })
}
