//! Shutdown coordination for the operator.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// The controller loop and the admin server each subscribe; a single
/// `trigger` stops both.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a coordinator with no subscribers yet.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Get a receiver that fires once shutdown is triggered.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    pub(crate) fn sender(&self) -> broadcast::Sender<()> {
        self.tx.clone()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_all_subscribers() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();

        shutdown.trigger();

        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }
}
