//! Client for the dispatch server.
//!
//! Used by the `client` run mode and by the integration tests.

use std::net::SocketAddr;

use anyhow::{anyhow, bail, Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config;
use crate::dispatch::TravelDirection;

use super::protocol::{self, RemoteError, Request, Response};

/// A connection to a dispatch server. Requests are answered in order, one line each.
pub struct DispatchClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    line: String,
}

impl DispatchClient {
    /// Connects to the server at `addr`, giving up after [config::CONNECT_TIMEOUT].
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = timeout(config::CONNECT_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| anyhow!("Timed out connecting to {}", addr))?
            .with_context(|| format!("Couldnt connect to {}", addr))?;
        let (read_half, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer,
            line: String::new(),
        })
    }

    /// Sends one request and waits for its response.
    ///
    /// Error responses are returned as `Ok(Response::Error { .. })`; only transport
    /// failures end up as `Err`.
    pub async fn send(&mut self, request: &Request) -> Result<Response> {
        self.writer
            .write_all(&protocol::encode_line(request)?)
            .await
            .context("Couldnt send request")?;

        self.line.clear();
        let n = timeout(config::RESPONSE_TIMEOUT, self.reader.read_line(&mut self.line))
            .await
            .map_err(|_| anyhow!("No response within {:?}", config::RESPONSE_TIMEOUT))?
            .context("Couldnt read response")?;
        if n == 0 {
            bail!("Server closed the connection");
        }
        serde_json::from_str(self.line.trim()).context("Server sent an unreadable response")
    }

    /// Turns error responses into [RemoteError].
    async fn call(&mut self, request: Request) -> Result<Response> {
        match self.send(&request).await? {
            Response::Error { kind, message } => Err(RemoteError { kind, message }.into()),
            resp => Ok(resp),
        }
    }

    /// Requests a stop at `floor`.
    pub async fn add(&mut self, floor: i32) -> Result<()> {
        match self.call(Request::Add { floor }).await? {
            Response::Ok => Ok(()),
            other => bail!("Unexpected response to add: {:?}", other),
        }
    }

    /// Clears the request for `floor`. `false` if it was not outstanding.
    pub async fn remove(&mut self, floor: i32) -> Result<bool> {
        match self.call(Request::Remove { floor }).await? {
            Response::Removed { removed } => Ok(removed),
            other => bail!("Unexpected response to remove: {:?}", other),
        }
    }

    /// The outstanding floors.
    pub async fn list(&mut self) -> Result<Vec<i32>> {
        match self.call(Request::List).await? {
            Response::Floors { floors } => Ok(floors),
            other => bail!("Unexpected response to list: {:?}", other),
        }
    }

    /// The floor to stop at next.
    pub async fn next(&mut self, current_floor: i32, direction: TravelDirection) -> Result<Option<i32>> {
        match self.call(Request::Next { current_floor, direction }).await? {
            Response::Next { floor } => Ok(floor),
            other => bail!("Unexpected response to next: {:?}", other),
        }
    }
}
