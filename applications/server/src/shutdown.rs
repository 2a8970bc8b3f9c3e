//! OS signal handling for graceful shutdown.
//!
//! Handlers are installed up front with [`Signals::register`] so that a
//! registration failure is reported before the server starts listening.
//! On Unix both SIGINT and SIGTERM are observed; elsewhere only Ctrl+C.

use std::io;

/// Installed shutdown signal handlers
pub struct Signals {
    #[cfg(unix)]
    sigint: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
}

impl Signals {
    /// Install handlers for the interrupt and terminate signals
    #[cfg(unix)]
    pub fn register() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    pub fn register() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Wait for the next signal, returning its name
    #[cfg(unix)]
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigint.recv() => "SIGINT",
            _ = self.sigterm.recv() => "SIGTERM",
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> &'static str {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
        "ctrl-c"
    }
}

/// Wait for the first shutdown signal
///
/// A second signal terminates the process immediately without draining.
pub async fn shutdown_signal(mut signals: Signals) {
    let signal = signals.recv().await;
    tracing::info!(signal, "received a signal to shutdown");

    tokio::spawn(async move {
        let signal = signals.recv().await;
        tracing::warn!(signal, "received a second signal, terminating");
        std::process::exit(130);
    });
}
