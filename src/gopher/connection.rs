use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::gopher::render::Renderer;
use crate::gopher::request::{MAX_REQUEST_LEN, Request};
use crate::gopher::sniff::{Classifier, MimeSniffer};
use crate::gopher::writer::ResponseWriter;

/// One client connection: a single request, a single response, then close.
pub struct Connection<S = TcpStream, C = MimeSniffer> {
    stream: S,
    peer: SocketAddr,
    renderer: Arc<Renderer<C>>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S, C> Connection<S, C>
where
    S: AsyncRead + AsyncWrite + Unpin,
    C: Classifier,
{
    pub fn new(stream: S, peer: SocketAddr, renderer: Arc<Renderer<C>>) -> Self {
        Self {
            stream,
            peer,
            renderer,
            state: ConnectionState::Reading,
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Drives the connection to completion.
    ///
    /// The stream is owned by the connection and dropped with it, so the
    /// socket is released on every exit path.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(request) => {
                            info!(peer = %self.peer, selector = %request, "request");
                            ConnectionState::Processing(request)
                        }
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(request) => {
                    let response = self.renderer.render(&request).await;
                    debug!(
                        peer = %self.peer,
                        kind = ?response.kind(),
                        bytes = response.len(),
                        "response ready"
                    );
                    self.state = ConnectionState::Writing(ResponseWriter::new(response));
                }

                ConnectionState::Writing(mut writer) => {
                    let limit = self.renderer.config().write_timeout();
                    with_timeout(limit, writer.write_to_stream(&mut self.stream))
                        .await
                        .context("write failed")?;
                }

                ConnectionState::Closed => break,
            }
        }

        // Best effort; the socket closes on drop regardless.
        let _ = self.stream.shutdown().await;
        Ok(())
    }

    /// Reads the request with a single read of at most [`MAX_REQUEST_LEN`]
    /// bytes. Returns `None` if the client closed without sending anything.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let mut buf = [0u8; MAX_REQUEST_LEN];
        let limit = self.renderer.config().read_timeout();

        let n = with_timeout(limit, self.stream.read(&mut buf))
            .await
            .context("read failed")?;

        if n == 0 {
            debug!(peer = %self.peer, "client closed before sending a request");
            return Ok(None);
        }

        Ok(Some(Request::parse(&buf[..n])))
    }
}

async fn with_timeout<T, E, F>(limit: Option<Duration>, fut: F) -> anyhow::Result<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    match limit {
        Some(limit) => timeout(limit, fut)
            .await
            .context("timed out")?
            .map_err(Into::into),
        None => fut.await.map_err(Into::into),
    }
}
