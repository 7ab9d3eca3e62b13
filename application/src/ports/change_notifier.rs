//! Port for broadcasting vote-change events
//!
//! After any cast or remove, the use cases emit a [`VoteChangeEvent`] so
//! subscribed collaborators can refresh their view. The core never performs
//! the push itself; an adapter fans the event out (websocket broadcast,
//! realtime channel, etc.).
//!
//! The `notify` method is intentionally synchronous and non-fallible: a
//! slow or broken subscriber must never fail the write path.

use serde::{Deserialize, Serialize};
use wayfarer_domain::{ConsensusStatus, VoteCounts};

/// Emitted after a vote is cast, updated, or removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteChangeEvent {
    pub trip_id: String,
    pub activity_id: String,
    pub new_status: ConsensusStatus,
    pub vote_counts: VoteCounts,
}

/// Port for notifying subscribers of consensus changes
pub trait ChangeNotifier: Send + Sync {
    /// Deliver a change event to subscribers
    fn notify(&self, event: VoteChangeEvent);
}

/// No-op implementation for tests and when broadcasting is disabled
pub struct NoChangeNotifier;

impl ChangeNotifier for NoChangeNotifier {
    fn notify(&self, _event: VoteChangeEvent) {}
}
