//! HTTP server lifecycle.
//!
//! [`Server`] owns the listener and moves through
//! `Starting -> Listening -> ShuttingDown -> Stopped`, or into `Failed` when
//! the listener cannot be bound or stops working. Each connection is served by
//! its own task. On shutdown the listener is closed, every connection is asked
//! to finish its in-flight request, and whatever is still running when the
//! shutdown timeout elapses is aborted.
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{routing::get, Router};
//! use movieland_server::Server;
//!
//! # async fn example() -> movieland_server::Result<()> {
//! let router = Router::new().route("/healtz", get(|| async { "OK" }));
//! let addr = "127.0.0.1:3000".parse().unwrap();
//!
//! // Serves until SIGINT or SIGTERM
//! Server::new(addr, router).run().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, ServerError};
use crate::shutdown::{shutdown_signal, Signals};
use axum::Router;
use hyper::server::conn::http1;
use hyper_util::{rt::TokioIo, service::TowerToHyperService};
use std::{future::Future, io, net::SocketAddr, time::Duration};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpListener, TcpStream},
    sync::watch,
    task::{JoinError, JoinSet},
};
use tokio_util::sync::CancellationToken;

/// How long in-flight requests get to finish once shutdown starts
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Lifecycle state of a [`Server`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Starting,
    Listening,
    ShuttingDown,
    Stopped,
    Failed,
}

/// Source of incoming connections for [`Server::serve`]
pub trait Listener: Send + 'static {
    type Io: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Wait for the next connection
    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Io, SocketAddr)>> + Send;

    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl Listener for TcpListener {
    type Io = TcpStream;

    async fn accept(&mut self) -> io::Result<(TcpStream, SocketAddr)> {
        TcpListener::accept(self).await
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        TcpListener::local_addr(self)
    }
}

/// HTTP/1.1 server with graceful shutdown
pub struct Server {
    addr: SocketAddr,
    router: Router,
    shutdown_timeout: Duration,
    state: watch::Sender<ServerState>,
}

impl Server {
    pub fn new(addr: SocketAddr, router: Router) -> Self {
        let (state, _) = watch::channel(ServerState::Starting);

        Self {
            addr,
            router,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            state,
        }
    }

    /// Override the graceful shutdown timeout
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Subscribe to state changes
    pub fn state(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Serve until SIGINT or SIGTERM is received
    pub async fn run(self) -> Result<()> {
        let signals = Signals::register().map_err(ServerError::Signal)?;
        self.run_until(shutdown_signal(signals)).await
    }

    /// Bind the configured address and serve until `shutdown` completes
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener> {
        match TcpListener::bind(self.addr).await {
            Ok(listener) => Ok(listener),
            Err(source) => {
                self.state.send_replace(ServerState::Failed);
                tracing::error!(addr = %self.addr, err = %source, "could not bind listener");
                Err(ServerError::Bind {
                    addr: self.addr,
                    source,
                })
            }
        }
    }

    /// Serve connections from `listener` until `shutdown` completes
    ///
    /// A fatal listener error ends serving immediately, without waiting for
    /// `shutdown`.
    pub async fn serve<L, F>(self, mut listener: L, shutdown: F) -> Result<()>
    where
        L: Listener,
        F: Future<Output = ()>,
    {
        let port = listener
            .local_addr()
            .map_or(self.addr.port(), |addr| addr.port());

        self.state.send_replace(ServerState::Listening);
        tracing::info!(port, "started listening");

        let token = CancellationToken::new();
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = listener.accept() => match result {
                    Ok((stream, remote_addr)) => {
                        connections.spawn(serve_connection(
                            stream,
                            remote_addr,
                            self.router.clone(),
                            token.clone(),
                        ));
                    }
                    Err(err) if is_transient(&err) => {
                        tracing::debug!(%err, "failed to accept connection");
                    }
                    Err(err) => {
                        self.state.send_replace(ServerState::Failed);
                        tracing::error!(%err, "listener failed");
                        return Err(ServerError::Listener(err));
                    }
                },
                () = &mut shutdown => break,
                Some(result) = connections.join_next(), if !connections.is_empty() => {
                    log_panic(result);
                }
            }
        }

        drop(listener);
        self.state.send_replace(ServerState::ShuttingDown);
        tracing::info!(
            connections = connections.len(),
            timeout = ?self.shutdown_timeout,
            "gracefully shutting down"
        );
        token.cancel();

        let drained = tokio::time::timeout(self.shutdown_timeout, async {
            while let Some(result) = connections.join_next().await {
                log_panic(result);
            }
        })
        .await;

        let mut outcome = Ok(());

        if drained.is_err() {
            tracing::warn!(
                remaining = connections.len(),
                "graceful shutdown timed out, forcing exit"
            );
            connections.abort_all();

            while let Some(result) = connections.join_next().await {
                if let Err(err) = result {
                    if err.is_panic() {
                        outcome = Err(ServerError::Shutdown(format!(
                            "connection task panicked while closing: {err}"
                        )));
                    }
                }
            }
        }

        self.state.send_replace(ServerState::Stopped);
        tracing::info!("server stopped");

        outcome
    }
}

async fn serve_connection<I>(
    stream: I,
    remote_addr: SocketAddr,
    router: Router,
    token: CancellationToken,
) where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let io = TokioIo::new(stream);
    let service = TowerToHyperService::new(router);

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    let result = tokio::select! {
        result = conn.as_mut() => result,
        () = token.cancelled() => {
            // Finishes the in-flight request, then closes
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };

    if let Err(err) = result {
        tracing::debug!(%remote_addr, %err, "connection closed with error");
    }
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}

fn log_panic(result: std::result::Result<(), JoinError>) {
    if let Err(err) = result {
        if err.is_panic() {
            tracing::error!(%err, "connection task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    fn router() -> Router {
        Router::new().route("/healtz", get(|| async { "OK" }))
    }

    #[test]
    fn default_shutdown_timeout_is_thirty_seconds() {
        let server = Server::new("127.0.0.1:0".parse().unwrap(), router());
        assert_eq!(server.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(*server.state().borrow(), ServerState::Starting);
    }

    #[test]
    fn transient_accept_errors() {
        assert!(is_transient(&io::Error::from(io::ErrorKind::ConnectionReset)));
        assert!(!is_transient(&io::Error::from(io::ErrorKind::PermissionDenied)));
    }

    /// Listener whose accept calls fail with the queued errors, then hang
    struct ScriptedListener {
        errors: Vec<io::ErrorKind>,
    }

    impl Listener for ScriptedListener {
        type Io = TcpStream;

        async fn accept(&mut self) -> io::Result<(TcpStream, SocketAddr)> {
            match self.errors.pop() {
                Some(kind) => Err(io::Error::new(kind, "accept failed")),
                None => std::future::pending().await,
            }
        }

        fn local_addr(&self) -> io::Result<SocketAddr> {
            Ok("127.0.0.1:3000".parse().unwrap())
        }
    }

    #[tokio::test]
    async fn fatal_accept_error_fails_without_shutdown() {
        let server = Server::new("127.0.0.1:3000".parse().unwrap(), router());
        let state = server.state();
        let listener = ScriptedListener {
            errors: vec![io::ErrorKind::Other, io::ErrorKind::ConnectionReset],
        };

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            server.serve(listener, std::future::pending::<()>()),
        )
        .await
        .expect("fatal accept error should end serving");

        match result {
            Err(ServerError::Listener(err)) => assert_eq!(err.kind(), io::ErrorKind::Other),
            other => panic!("expected a listener error, got {other:?}"),
        }
        assert_eq!(*state.borrow(), ServerState::Failed);
    }

    #[tokio::test]
    async fn transient_accept_error_keeps_serving() {
        let server = Server::new("127.0.0.1:3000".parse().unwrap(), router());
        let state = server.state();
        let listener = ScriptedListener {
            errors: vec![io::ErrorKind::ConnectionAborted],
        };

        let result = server
            .serve(listener, tokio::time::sleep(Duration::from_millis(50)))
            .await;

        assert!(result.is_ok());
        assert_eq!(*state.borrow(), ServerState::Stopped);
    }

    #[tokio::test]
    async fn immediate_shutdown_stops_cleanly() {
        let server = Server::new("127.0.0.1:0".parse().unwrap(), router())
            .with_shutdown_timeout(Duration::from_millis(100));
        let state = server.state();

        let result = tokio::time::timeout(Duration::from_secs(5), server.run_until(async {})).await;

        assert!(matches!(result, Ok(Ok(()))));
        assert_eq!(*state.borrow(), ServerState::Stopped);
    }
}
