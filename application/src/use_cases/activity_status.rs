//! Activity status use case
//!
//! The read side of the voting engine: consensus snapshots and the
//! externally visible lifecycle status. Everything here recomputes from the
//! store on each call; results go stale within seconds because two rule
//! inputs (now, elapsed time) move without any vote event.

use crate::ports::clock::Clock;
use crate::ports::vote_store::{VoteStore, VoteStoreError};
use crate::use_cases::shared::consensus_snapshot;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use wayfarer_domain::{
    ActivityVotingStatus, ConsensusPolicy, ConsensusResult, StatusRecord, calculate_consensus,
    group_votes_by_activity,
};

/// Use case for reading consensus and lifecycle status
///
/// Status resolution order for a collaborative trip:
///
/// 1. An owner override record pins the status until voting is explicitly
///    re-opened.
/// 2. With no votes and no record, the status is the lifecycle default
///    (`Voting`), inviting participation instead of showing a frozen
///    `Waiting`.
/// 3. Otherwise the status is exactly the computed consensus.
///
/// Solo trips bypass the gate entirely: always `Confirmed`, and the
/// calculator is never invoked.
pub struct ActivityStatusUseCase<S: VoteStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    policy: ConsensusPolicy,
}

impl<S: VoteStore> ActivityStatusUseCase<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            policy: ConsensusPolicy::default(),
        }
    }

    /// Override the default consensus policy
    pub fn with_policy(mut self, policy: ConsensusPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The externally visible voting status for one activity
    pub async fn voting_status(
        &self,
        trip_id: &str,
        activity_id: &str,
    ) -> Result<ActivityVotingStatus, VoteStoreError> {
        let mode = self.store.trip_mode(trip_id).await?;
        if !mode.is_collaborative() {
            return Ok(mode.default_status());
        }

        let record = self.store.get_status_record(trip_id, activity_id).await?;
        if let Some(record) = &record {
            if record.is_override() {
                debug!(trip_id, activity_id, status = %record.status, "owner override in effect");
                return Ok(record.status);
            }
        }

        let votes = self.store.list_votes(trip_id, activity_id).await?;
        if votes.is_empty() && record.is_none() {
            return Ok(mode.default_status());
        }

        let consensus = consensus_snapshot(
            self.store.as_ref(),
            trip_id,
            activity_id,
            &self.policy,
            self.clock.now(),
        )
        .await?;
        Ok(consensus.status.into())
    }

    /// Raw consensus snapshot for one activity
    pub async fn consensus(
        &self,
        trip_id: &str,
        activity_id: &str,
    ) -> Result<ConsensusResult, VoteStoreError> {
        consensus_snapshot(
            self.store.as_ref(),
            trip_id,
            activity_id,
            &self.policy,
            self.clock.now(),
        )
        .await
    }

    /// Batch consensus snapshots for every activity with votes on a trip
    pub async fn trip_consensus(
        &self,
        trip_id: &str,
    ) -> Result<HashMap<String, ConsensusResult>, VoteStoreError> {
        let now = self.clock.now();
        let votes = self.store.list_trip_votes(trip_id).await?;
        let eligible = self.store.list_eligible_voter_ids(trip_id).await?;

        let mut results = HashMap::new();
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
            results.insert(activity_id, result);
        }
        Ok(results)
    }

    /// Owner manually confirms or rejects, overriding the computed status
    ///
    /// The caller is responsible for verifying the actor is the trip owner;
    /// role checks live behind the authorization port, outside this core.
    /// The override is terminal until a fresh lifecycle record re-opens
    /// voting.
    pub async fn override_status(
        &self,
        trip_id: &str,
        activity_id: &str,
        confirmed: bool,
    ) -> Result<StatusRecord, VoteStoreError> {
        let now = self.clock.now();
        let record = self
            .store
            .get_status_record(trip_id, activity_id)
            .await?
            .unwrap_or_else(|| StatusRecord::proposed(trip_id, activity_id, None, now))
            .owner_override(confirmed, now);

        self.store.put_status_record(record.clone()).await?;
        info!(trip_id, activity_id, status = %record.status, "owner override recorded");
        Ok(record)
    }

    /// Re-open voting on an overridden activity (explicit action)
    pub async fn reopen_voting(
        &self,
        trip_id: &str,
        activity_id: &str,
        proposed_by: Option<String>,
    ) -> Result<StatusRecord, VoteStoreError> {
        let record = StatusRecord::proposed(trip_id, activity_id, proposed_by, self.clock.now());
        self.store.put_status_record(record.clone()).await?;
        info!(trip_id, activity_id, "voting re-opened");
        Ok(record)
    }
}
