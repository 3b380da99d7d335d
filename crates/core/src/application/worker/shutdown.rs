// Graceful shutdown signalling between the daemon and its workers.
//
// One sender, any number of cloned tokens. The signal is level-triggered:
// a token created or checked after shutdown still observes it.

use tokio::sync::watch;

/// Receiver half handed to each worker loop
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Non-blocking check, polled between batches
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve when shutdown is signalled (used inside select! with sleeps)
    pub async fn wait(&mut self) {
        let _ = self.rx.changed().await;
    }
}

/// Sender half kept by the composition root
pub struct ShutdownSender {
    tx: watch::Sender<bool>,
}

impl ShutdownSender {
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownToken { rx })
}
