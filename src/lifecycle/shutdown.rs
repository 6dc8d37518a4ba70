//! Stop fan-out for the edge and embed servers.
//!
//! One `Shutdown` per process; each server holds a receiver and hands
//! [`drained`] to axum's graceful shutdown, so a single signal stops
//! accepting on every listener while in-flight requests complete.

use tokio::sync::broadcast;

/// Process-wide stop switch. Clones share the same channel.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for a server that should stop with the process.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Tell every subscribed server to stop; returns how many were reached.
    pub fn trigger(&self) -> usize {
        let reached = self.tx.send(()).unwrap_or(0);
        tracing::info!(servers = reached, "Stopping servers");
        reached
    }

    /// Servers that have not yet dropped their receiver.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves when `rx` is told to stop, or when every `Shutdown` handle is gone.
pub async fn drained(mut rx: broadcast::Receiver<()>) {
    let _ = rx.recv().await;
}
