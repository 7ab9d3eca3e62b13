//! Cast vote use case
//!
//! Validates a ballot, checks vote rights, upserts the vote, recomputes the
//! consensus snapshot, and emits a change event for subscribers.

use crate::ports::authorizer::{AuthorizerError, VoteAuthorizer};
use crate::ports::change_notifier::ChangeNotifier;
use crate::ports::clock::Clock;
use crate::ports::vote_store::{NewVote, VoteStore, VoteStoreError};
use crate::use_cases::shared::{change_event, consensus_snapshot};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use wayfarer_domain::{
    ConsensusPolicy, ConsensusResult, Vote, VoteError, VoteType, VoteWeight, validate_ballot,
};

/// Errors that can occur while casting a vote
#[derive(Error, Debug)]
pub enum CastVoteError {
    /// Field-level validation failed; no state changed
    #[error(transparent)]
    InvalidVote(#[from] VoteError),

    #[error("user {user_id} may not vote on trip {trip_id}")]
    NotAuthorized { user_id: String, trip_id: String },

    #[error(transparent)]
    Authorizer(#[from] AuthorizerError),

    #[error(transparent)]
    Store(#[from] VoteStoreError),
}

/// Input for the CastVote use case
#[derive(Debug, Clone)]
pub struct CastVoteInput {
    pub trip_id: String,
    pub activity_id: String,
    pub user_id: String,
    pub vote_type: VoteType,
    pub comment: Option<String>,
    pub weight: VoteWeight,
}

impl CastVoteInput {
    pub fn new(
        trip_id: impl Into<String>,
        activity_id: impl Into<String>,
        user_id: impl Into<String>,
        vote_type: VoteType,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            activity_id: activity_id.into(),
            user_id: user_id.into(),
            vote_type,
            comment: None,
            weight: VoteWeight::default(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_weight(mut self, weight: VoteWeight) -> Self {
        self.weight = weight;
        self
    }
}

/// Result of casting a vote
#[derive(Debug, Clone)]
pub struct CastVoteOutput {
    /// The stored vote (store-assigned id and timestamps)
    pub vote: Vote,
    /// Whether an existing vote was replaced rather than newly cast
    pub is_update: bool,
    /// Fresh consensus snapshot after the write
    pub consensus: ConsensusResult,
}

/// Use case for casting or updating a vote
pub struct CastVoteUseCase<S: VoteStore> {
    store: Arc<S>,
    authorizer: Arc<dyn VoteAuthorizer>,
    notifier: Arc<dyn ChangeNotifier>,
    clock: Arc<dyn Clock>,
    policy: ConsensusPolicy,
}

impl<S: VoteStore> CastVoteUseCase<S> {
    pub fn new(
        store: Arc<S>,
        authorizer: Arc<dyn VoteAuthorizer>,
        notifier: Arc<dyn ChangeNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            authorizer,
            notifier,
            clock,
            policy: ConsensusPolicy::default(),
        }
    }

    /// Override the default consensus policy
    pub fn with_policy(mut self, policy: ConsensusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn execute(&self, input: CastVoteInput) -> Result<CastVoteOutput, CastVoteError> {
        // Validation first: invalid ballots never reach the store
        validate_ballot(input.vote_type, input.comment.as_deref())?;

        if !self
            .authorizer
            .can_vote(&input.user_id, &input.trip_id)
            .await?
        {
            return Err(CastVoteError::NotAuthorized {
                user_id: input.user_id,
                trip_id: input.trip_id,
            });
        }

        let mut ballot = NewVote::new(
            &input.trip_id,
            &input.activity_id,
            &input.user_id,
            input.vote_type,
        );
        ballot.comment = input.comment.map(|c| c.trim().to_string());
        ballot.weight = input.weight;

        let (vote, is_update) = self.store.upsert_vote(ballot).await?;
        info!(
            trip_id = %input.trip_id,
            activity_id = %input.activity_id,
            vote_type = %input.vote_type,
            is_update,
            "vote cast"
        );

        // Writes stay cheap: the snapshot below only feeds the change
        // event and the response; every later read recomputes on its own.
        let consensus = consensus_snapshot(
            self.store.as_ref(),
            &input.trip_id,
            &input.activity_id,
            &self.policy,
            self.clock.now(),
        )
        .await?;
        debug!(status = %consensus.status, score = consensus.score, "consensus after cast");

        self.notifier
            .notify(change_event(&input.trip_id, &input.activity_id, &consensus));

        Ok(CastVoteOutput {
            vote,
            is_update,
            consensus,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::authorizer::AllowAllVoters;
    use crate::ports::change_notifier::NoChangeNotifier;
    use crate::ports::clock::FixedClock;
    use crate::use_cases::test_support::{DenyAll, MemStore, RecordingNotifier};
    use chrono::Utc;
    use wayfarer_domain::ConsensusStatus;

    fn use_case(store: Arc<MemStore>) -> CastVoteUseCase<MemStore> {
        CastVoteUseCase::new(
            store,
            Arc::new(AllowAllVoters),
            Arc::new(NoChangeNotifier),
            Arc::new(FixedClock(Utc::now())),
        )
    }

    #[tokio::test]
    async fn test_cast_vote_stores_and_recomputes() {
        let store = Arc::new(MemStore::collaborative("trip", &["ana", "ben"]));
        let uc = use_case(Arc::clone(&store));

        let out = uc
            .execute(CastVoteInput::new("trip", "act", "ana", VoteType::Love))
            .await
            .unwrap();

        assert!(!out.is_update);
        assert_eq!(out.vote.vote_type, VoteType::Love);
        assert_eq!(out.consensus.vote_counts.love, 1);
        // 1 of 2 voted, score 2.0: strong consensus
        assert_eq!(out.consensus.status, ConsensusStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_revote_updates_in_place() {
        let store = Arc::new(MemStore::collaborative("trip", &["ana", "ben"]));
        let uc = use_case(Arc::clone(&store));

        let first = uc
            .execute(CastVoteInput::new("trip", "act", "ana", VoteType::Love))
            .await
            .unwrap();
        let second = uc
            .execute(
                CastVoteInput::new("trip", "act", "ana", VoteType::Concerns)
                    .with_comment("a bit pricey"),
            )
            .await
            .unwrap();

        assert!(second.is_update);
        assert_eq!(second.vote.id, first.vote.id);
        assert_eq!(second.vote.voted_at, first.vote.voted_at);
        // Still exactly one vote
        assert_eq!(second.consensus.vote_counts.total(), 1);
        assert_eq!(second.consensus.vote_counts.concerns, 1);
    }

    #[tokio::test]
    async fn test_missing_comment_rejected_before_store() {
        let store = Arc::new(MemStore::collaborative("trip", &["ana"]));
        let uc = use_case(Arc::clone(&store));

        let err = uc
            .execute(CastVoteInput::new("trip", "act", "ana", VoteType::No))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CastVoteError::InvalidVote(VoteError::MissingComment(VoteType::No))
        ));
        assert!(store.votes("trip", "act").await.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_user_rejected() {
        let store = Arc::new(MemStore::collaborative("trip", &["ana"]));
        let uc = CastVoteUseCase::new(
            Arc::clone(&store),
            Arc::new(DenyAll),
            Arc::new(NoChangeNotifier),
            Arc::new(FixedClock(Utc::now())),
        );

        let err = uc
            .execute(CastVoteInput::new("trip", "act", "viewer", VoteType::Love))
            .await
            .unwrap_err();

        assert!(matches!(err, CastVoteError::NotAuthorized { .. }));
        assert!(store.votes("trip", "act").await.is_empty());
    }

    #[tokio::test]
    async fn test_change_event_emitted_with_counts() {
        let store = Arc::new(MemStore::collaborative("trip", &["ana", "ben"]));
        let notifier = Arc::new(RecordingNotifier::default());
        let uc = CastVoteUseCase::new(
            Arc::clone(&store),
            Arc::new(AllowAllVoters),
            Arc::clone(&notifier) as Arc<dyn ChangeNotifier>,
            Arc::new(FixedClock(Utc::now())),
        );

        uc.execute(CastVoteInput::new("trip", "act", "ana", VoteType::Flexible))
            .await
            .unwrap();

        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].activity_id, "act");
        assert_eq!(events[0].vote_counts.flexible, 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = Arc::new(MemStore::collaborative("trip", &["ana"]));
        store.fail_next().await;
        let uc = use_case(Arc::clone(&store));

        let err = uc
            .execute(CastVoteInput::new("trip", "act", "ana", VoteType::Love))
            .await
            .unwrap_err();

        match err {
            CastVoteError::Store(e) => assert!(e.is_retryable()),
            other => panic!("expected store error, got {other:?}"),
        }
    }
}
