//! Shutdown coordination for the proxy.

use tokio::sync::broadcast;

/// Fan-out shutdown trigger.
///
/// The binary triggers it on a signal; tests trigger it directly. Each
/// [`HttpServer`](crate::http::HttpServer) holds one [`ShutdownListener`].
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Hand out a listener that resolves once [`trigger`](Self::trigger) is called.
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every listener to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Listeners that have not been dropped yet.
    pub fn listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half of [`Shutdown`].
#[derive(Debug)]
pub struct ShutdownListener {
    rx: broadcast::Receiver<()>,
}

impl ShutdownListener {
    /// Resolve when shutdown is triggered or the coordinator is dropped.
    pub async fn wait(mut self) {
        // Lagged cannot happen with a single message; Closed means the owner is gone.
        let _ = self.rx.recv().await;
    }
}
