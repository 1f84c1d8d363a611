use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Listens for SIGINT and SIGTERM and turns either into a cancellation of
/// the shared token.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    cancel_token: CancellationToken,
    shutdown_requested: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new(cancel_token: CancellationToken) -> Self {
        Self {
            cancel_token,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Installs the OS handlers immediately, then waits for a signal on a
    /// background task. Must be called from within the runtime.
    pub fn register_handlers(&self) {
        let cancel_token = self.cancel_token.clone();
        let shutdown_flag = self.shutdown_requested.clone();

        // Created here rather than in the task so a signal that lands before
        // the task is first polled is not handled by the default action.
        #[cfg(unix)]
        let mut interrupt = install(SignalKind::interrupt(), "SIGINT");
        #[cfg(unix)]
        let mut terminate = install(SignalKind::terminate(), "SIGTERM");

        tokio::spawn(async move {
            #[cfg(unix)]
            let received = tokio::select! {
                biased;
                _ = cancel_token.cancelled() => return,
                _ = recv(&mut interrupt) => "SIGINT",
                _ = recv(&mut terminate) => "SIGTERM",
            };

            #[cfg(not(unix))]
            let received = tokio::select! {
                biased;
                _ = cancel_token.cancelled() => return,
                result = tokio::signal::ctrl_c() => {
                    if let Err(err) = result {
                        error!("Failed to listen for Ctrl+C: {err}");
                        return;
                    }
                    "Ctrl+C"
                }
            };

            info!("Received {received}, initiating graceful shutdown");
            shutdown_flag.store(true, Ordering::SeqCst);
            cancel_token.cancel();
        });
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }
}

#[cfg(unix)]
fn install(kind: SignalKind, name: &str) -> Option<Signal> {
    match signal(kind) {
        Ok(stream) => Some(stream),
        Err(err) => {
            error!("Failed to install {name} handler: {err}");
            None
        }
    }
}

#[cfg(unix)]
async fn recv(stream: &mut Option<Signal>) {
    match stream {
        Some(stream) => {
            stream.recv().await;
        }
        None => std::future::pending().await,
    }
}
