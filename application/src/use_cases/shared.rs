//! Shared helpers for the voting use cases

use crate::ports::change_notifier::VoteChangeEvent;
use crate::ports::vote_store::{VoteStore, VoteStoreError};
use chrono::{DateTime, Utc};
use wayfarer_domain::{ConsensusPolicy, ConsensusResult, calculate_consensus};

/// Recompute the consensus snapshot for one activity from the store
///
/// Reads the current votes, the eligible roster, and the lifecycle record
/// (for `proposed_at`; an activity without a record is treated as proposed
/// just now, so no time-gated rule can fire yet). Any store failure
/// propagates: consensus is never computed over partial data.
pub(crate) async fn consensus_snapshot<S: VoteStore + ?Sized>(
    store: &S,
    trip_id: &str,
    activity_id: &str,
    policy: &ConsensusPolicy,
    now: DateTime<Utc>,
) -> Result<ConsensusResult, VoteStoreError> {
    let votes = store.list_votes(trip_id, activity_id).await?;
    let eligible = store.list_eligible_voter_ids(trip_id).await?;
    let proposed_at = store
        .get_status_record(trip_id, activity_id)
        .await?
        .map(|record| record.proposed_at)
        .unwrap_or(now);

    Ok(calculate_consensus(
        &votes,
        eligible.len(),
        proposed_at,
        now,
        &eligible,
        policy,
    ))
}

/// Build the broadcast payload for a recomputed snapshot
pub(crate) fn change_event(
    trip_id: &str,
    activity_id: &str,
    consensus: &ConsensusResult,
) -> VoteChangeEvent {
    VoteChangeEvent {
        trip_id: trip_id.to_string(),
        activity_id: activity_id.to_string(),
        new_status: consensus.status,
        vote_counts: consensus.vote_counts,
    }
}
