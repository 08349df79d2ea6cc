//! TCP accept loop.
//!
//! The listener binds an IPv4 address only and owns the socket. It refuses
//! blocked peers before reading from them and spawns one task per accepted
//! connection. Tasks are not awaited
//! or supervised. Without `max_connections` there is no upper bound on
//! concurrent handlers; with it, a semaphore permit is held for each
//! connection's lifetime and accepting waits for a free slot.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::{TcpListener, lookup_host};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::gopher::connection::Connection;
use crate::gopher::render::Renderer;
use crate::gopher::sniff::{Classifier, MimeSniffer};

/// Pause after a transient accept failure (e.g. out of file descriptors).
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("listener is no longer usable: {0}")]
    Accept(#[source] io::Error),

    #[error("connection limiter closed")]
    LimiterClosed,
}

pub struct Listener<C = MimeSniffer> {
    inner: TcpListener,
    renderer: Arc<Renderer<C>>,
    connection_limit: Option<Arc<Semaphore>>,
}

impl Listener<MimeSniffer> {
    pub async fn bind(config: Arc<ServerConfig>) -> Result<Self, ListenerError> {
        Self::with_renderer(Arc::new(Renderer::new(config))).await
    }
}

impl<C> Listener<C>
where
    C: Classifier + 'static,
{
    pub async fn with_renderer(renderer: Arc<Renderer<C>>) -> Result<Self, ListenerError> {
        let config = renderer.config();
        let addr = config.bind_addr();

        let bind_err = |source| ListenerError::Bind {
            addr: addr.clone(),
            source,
        };
        let local = resolve_ipv4(config.listen_addr(), config.listen_port())
            .await
            .map_err(bind_err)?;
        let inner = TcpListener::bind(local).await.map_err(bind_err)?;

        let connection_limit = config
            .max_connections()
            .map(|max| Arc::new(Semaphore::new(max)));

        Ok(Self {
            inner,
            renderer,
            connection_limit,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Accepts connections until the listener becomes unusable.
    ///
    /// Transient accept errors are logged and the loop continues.
    pub async fn serve(self) -> Result<(), ListenerError> {
        loop {
            let permit = match &self.connection_limit {
                Some(limit) => Some(
                    limit
                        .clone()
                        .acquire_owned()
                        .await
                        .map_err(|_| ListenerError::LimiterClosed)?,
                ),
                None => None,
            };

            let (socket, peer) = match self.inner.accept().await {
                Ok(accepted) => accepted,
                Err(e) if is_fatal(&e) => {
                    error!(error = %e, "accept failed, stopping listener");
                    return Err(ListenerError::Accept(e));
                }
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };

            let peer_text = peer.to_string();
            if let Some(entry) = self.renderer.config().blocklist().matching_entry(&peer_text) {
                debug!(peer = %peer, entry, "peer blocked");
                drop(socket);
                continue;
            }

            let renderer = Arc::clone(&self.renderer);
            tokio::spawn(async move {
                let _permit = permit;
                let mut conn = Connection::new(socket, peer, renderer);
                if let Err(e) = conn.run().await {
                    error!(peer = %peer, error = %format!("{e:#}"), "connection error");
                }
            });
        }
    }
}

/// Resolves the listen address, keeping only IPv4 results.
async fn resolve_ipv4(host: &str, port: u16) -> io::Result<SocketAddr> {
    lookup_host((host, port))
        .await?
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("{host} has no IPv4 address"),
            )
        })
}

/// Accept errors that mean the socket itself is broken rather than a
/// single incoming connection.
fn is_fatal(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::InvalidInput | io::ErrorKind::NotConnected
    )
}

pub async fn run(config: Arc<ServerConfig>) -> anyhow::Result<()> {
    let listener = Listener::bind(config).await?;
    info!("Listening on {}", listener.local_addr()?);

    listener.serve().await?;
    Ok(())
}
