//! Process-wide shutdown coordination.
//!
//! A single [`Shutdown`] handle is shared by the signal listener, the tray and
//! the HTTP server. Triggering it lets in-flight requests finish and then
//! stops the listener.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Cloneable handle used to request and observe shutdown.
#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create an untriggered controller.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Request shutdown. Repeated calls are harmless.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    /// Whether shutdown has been requested.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Future that resolves once shutdown is requested.
    pub fn signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut receiver = self.sender.subscribe();
        async move {
            let _ = receiver.wait_for(|triggered| *triggered).await;
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Trigger `shutdown` when the process receives Ctrl-C or SIGTERM.
pub(crate) fn spawn_signal_listener(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        let stopped = shutdown.signal();
        tokio::select! {
            received = os_signal() => match received {
                Ok(name) => {
                    info!(signal = name, "Shutdown signal received");
                    shutdown.trigger();
                }
                Err(err) => warn!(error = %err, "signal listener unavailable"),
            },
            () = stopped => {}
        }
    })
}

#[cfg(unix)]
async fn os_signal() -> AppResult<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())
        .map_err(|source| AppError::io("signal.sigterm", source))?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.map_err(|source| AppError::io("signal.ctrl_c", source))?;
            Ok("ctrl_c")
        }
        _ = terminate.recv() => Ok("sigterm"),
    }
}

#[cfg(not(unix))]
async fn os_signal() -> AppResult<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|source| AppError::io("signal.ctrl_c", source))?;
    Ok("ctrl_c")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::time::Duration;

    #[tokio::test]
    async fn signal_resolves_after_trigger() -> Result<()> {
        let shutdown = Shutdown::new();
        let waiter = tokio::spawn(shutdown.signal());
        assert!(!shutdown.is_triggered());

        shutdown.clone().trigger();
        tokio::time::timeout(Duration::from_secs(5), waiter).await??;
        assert!(shutdown.is_triggered());
        Ok(())
    }

    #[tokio::test]
    async fn late_subscribers_see_prior_trigger() -> Result<()> {
        let shutdown = Shutdown::default();
        shutdown.trigger();
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), shutdown.signal()).await?;
        Ok(())
    }

    #[tokio::test]
    async fn signal_listener_exits_once_shutdown_is_requested() -> Result<()> {
        let shutdown = Shutdown::new();
        let listener = spawn_signal_listener(shutdown.clone());
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), listener).await??;
        Ok(())
    }
}
