//! Broadcast-channel change notifier
//!
//! Fans [`VoteChangeEvent`]s out to any number of subscribers (websocket
//! sessions, realtime bridges) over a `tokio::sync::broadcast` channel.
//! Delivery is best-effort: lagging or disconnected receivers never fail
//! the write path.

use tokio::sync::broadcast;
use tracing::debug;
use wayfarer_application::{ChangeNotifier, VoteChangeEvent};

/// [`ChangeNotifier`] backed by a tokio broadcast channel
pub struct BroadcastNotifier {
    sender: broadcast::Sender<VoteChangeEvent>,
}

impl BroadcastNotifier {
    /// Create a notifier buffering up to `capacity` undelivered events per
    /// subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Open a new subscription for consensus change events
    pub fn subscribe(&self) -> broadcast::Receiver<VoteChangeEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn notify(&self, event: VoteChangeEvent) {
        // send only errors when there are no receivers; that is fine
        if let Err(error) = self.sender.send(event) {
            debug!(%error, "no subscribers for vote change event");
        }
    }
}
