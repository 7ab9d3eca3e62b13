//! Periodic consensus re-evaluation sweep
//!
//! The auto-confirm and deadlock rules fire on elapsed time, so an activity
//! can change status with no vote event for a push-on-write notifier to
//! ride on. The sweep closes that gap: it periodically recomputes every
//! activity with votes and re-emits change events for statuses that flipped
//! since the last pass.
//!
//! This is an optional augmentation. Read-time recomputation alone is
//! correct; embedders that do not need real-time push of the automatic
//! transitions can skip the sweep entirely.

use crate::ports::change_notifier::{ChangeNotifier, VoteChangeEvent};
use crate::ports::clock::Clock;
use crate::ports::vote_store::{VoteStore, VoteStoreError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use wayfarer_domain::{ConsensusPolicy, ConsensusStatus, calculate_consensus, group_votes_by_activity};

/// Re-evaluates trip consensus on a timer and emits change events
pub struct ConsensusSweep<S: VoteStore> {
    store: Arc<S>,
    notifier: Arc<dyn ChangeNotifier>,
    clock: Arc<dyn Clock>,
    policy: ConsensusPolicy,
    /// Last observed status per (trip, activity); the first pass seeds this
    /// baseline without emitting.
    last_seen: Mutex<HashMap<(String, String), ConsensusStatus>>,
}

impl<S: VoteStore> ConsensusSweep<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn ChangeNotifier>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            notifier,
            clock,
            policy: ConsensusPolicy::default(),
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Override the default consensus policy
    pub fn with_policy(mut self, policy: ConsensusPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Re-evaluate one trip, emitting events for statuses that changed
    /// since the previous pass. Returns the emitted events.
    pub async fn sweep_trip(&self, trip_id: &str) -> Result<Vec<VoteChangeEvent>, VoteStoreError> {
        let now = self.clock.now();
        let votes = self.store.list_trip_votes(trip_id).await?;
        let eligible = self.store.list_eligible_voter_ids(trip_id).await?;

        let mut emitted = Vec::new();
        let mut last_seen = self.last_seen.lock().await;

        for (activity_id, activity_votes) in group_votes_by_activity(votes) {
            let proposed_at = self
                .store
                .get_status_record(trip_id, &activity_id)
                .await?
                .map(|record| record.proposed_at)
                .unwrap_or(now);
            let result = calculate_consensus(
                &activity_votes,
                eligible.len(),
                proposed_at,
                now,
                &eligible,
                &self.policy,
            );

            let key = (trip_id.to_string(), activity_id.clone());
            let previous = last_seen.insert(key, result.status);
            match previous {
                Some(prev) if prev != result.status => {
                    debug!(trip_id, activity_id = %activity_id, from = %prev, to = %result.status, "sweep detected flip");
                    let event = VoteChangeEvent {
                        trip_id: trip_id.to_string(),
                        activity_id,
                        new_status: result.status,
                        vote_counts: result.vote_counts,
                    };
                    self.notifier.notify(event.clone());
                    emitted.push(event);
                }
                _ => {}
            }
        }
        Ok(emitted)
    }

    /// Sweep the given trips forever on a fixed interval
    ///
    /// Store failures are logged and retried on the next tick rather than
    /// stopping the sweep.
    pub async fn run(&self, trip_ids: Vec<String>, every: Duration) {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            for trip_id in &trip_ids {
                if let Err(error) = self.sweep_trip(trip_id).await {
                    warn!(trip_id = %trip_id, %error, retryable = error.is_retryable(), "sweep pass failed");
                }
            }
        }
    }
}
