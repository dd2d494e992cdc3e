// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Shutdown coordination shared by every loop
pub struct SignalHandler {
    /// Woken when shutdown is requested
    pub shutdown: Notify,
    /// Set before `shutdown` is notified; loops check it between waits
    pub shutdown_requested: AtomicBool,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Notify::new(),
            shutdown_requested: AtomicBool::new(false),
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown has been requested
    ///
    /// Registers interest before checking the flag, so a request racing with
    /// this call is never missed.
    pub async fn wait(&self) {
        let notified = self.shutdown.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_shutdown() {
            return;
        }
        notified.await;
    }

    /// Flag shutdown and wake every waiting loop
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.shutdown.notify_waiters();
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix only)
///
/// | Signal  | Action           |
/// |---------|------------------|
/// | SIGTERM | Graceful stop    |
/// | SIGINT  | Graceful stop    |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    logger::log_error(&format!("[SIGNAL] Failed to register handlers: {e}"));
                    return;
                }
            };

        logger::log_debug(&format!(
            "[SIGNAL] Handlers registered for SIGTERM/SIGINT, pid {}",
            std::process::id()
        ));

        tokio::select! {
            _ = sigterm.recv() => logger::log_info("[SIGNAL] SIGTERM received, shutting down"),
            _ = sigint.recv() => logger::log_info("[SIGNAL] SIGINT received, shutting down"),
        }
        handler.request_shutdown();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_info("[SIGNAL] Ctrl+C received, shutting down");
            handler.request_shutdown();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_shutdown_wakes_waiter() {
        let handler = Arc::new(SignalHandler::new());
        let waiter = {
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                handler.wait().await;
                handler.is_shutdown()
            })
        };
        tokio::task::yield_now().await;
        handler.request_shutdown();
        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_wait_after_shutdown_returns_immediately() {
        let handler = SignalHandler::new();
        handler.request_shutdown();
        handler.wait().await;
    }
}
