// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)
// - SIGUSR1: Reopen log files

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Signal handler state
pub struct SignalHandler {
    /// Shutdown signal (SIGTERM, SIGINT)
    pub shutdown: Arc<Notify>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Wake the accept loop
    pub fn request_shutdown(&self, reason: &str) {
        logger::log_info(&format!("[SIGNAL] {reason} received, shutting down"));
        // The accept loop may not be parked in `notified()` yet; a stored permit covers that
        self.shutdown.notify_one();
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix)
///
/// | Signal  | Action            |
/// |---------|-------------------|
/// | SIGTERM | Graceful stop     |
/// | SIGINT  | Graceful stop     |
/// | SIGUSR1 | Reopen log files  |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let registered = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
            signal(SignalKind::user_defined1()),
        );
        let (mut sigterm, mut sigint, mut sigusr1) = match registered {
            (Ok(term), Ok(int), Ok(usr1)) => (term, int, usr1),
            (term, int, usr1) => {
                let err = [term.err(), int.err(), usr1.err()]
                    .into_iter()
                    .flatten()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                logger::log_warning(&format!(
                    "[SIGNAL] Failed to register handlers ({err}); falling back to Ctrl+C only"
                ));
                if tokio::signal::ctrl_c().await.is_ok() {
                    handler.request_shutdown("Ctrl+C");
                }
                return;
            }
        };

        logger::log_debug(&format!(
            "[SIGNAL] Handlers registered for SIGTERM, SIGINT, SIGUSR1 (pid {})",
            std::process::id()
        ));

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    handler.request_shutdown("SIGTERM");
                    break;
                }
                _ = sigint.recv() => {
                    handler.request_shutdown("SIGINT");
                    break;
                }
                _ = sigusr1.recv() => {
                    logger::reopen();
                }
            }
        }
    });
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handler.request_shutdown("Ctrl+C");
        }
    });
}
