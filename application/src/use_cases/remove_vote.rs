//! Remove vote use case
//!
//! Deletes a user's vote if present. Removal is idempotent: removing a
//! vote that does not exist is a no-op, not an error.

use crate::ports::authorizer::{AuthorizerError, VoteAuthorizer};
use crate::ports::change_notifier::ChangeNotifier;
use crate::ports::clock::Clock;
use crate::ports::vote_store::{VoteStore, VoteStoreError};
use crate::use_cases::shared::{change_event, consensus_snapshot};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use wayfarer_domain::{ConsensusPolicy, ConsensusResult};

/// Errors that can occur while removing a vote
#[derive(Error, Debug)]
pub enum RemoveVoteError {
    #[error("user {user_id} may not vote on trip {trip_id}")]
    NotAuthorized { user_id: String, trip_id: String },

    #[error(transparent)]
    Authorizer(#[from] AuthorizerError),

    #[error(transparent)]
    Store(#[from] VoteStoreError),
}

/// Input for the RemoveVote use case
#[derive(Debug, Clone)]
pub struct RemoveVoteInput {
    pub trip_id: String,
    pub activity_id: String,
    pub user_id: String,
}

impl RemoveVoteInput {
    pub fn new(
        trip_id: impl Into<String>,
        activity_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            activity_id: activity_id.into(),
            user_id: user_id.into(),
        }
    }
}

/// Result of removing a vote
#[derive(Debug, Clone)]
pub struct RemoveVoteOutput {
    /// Whether a vote actually existed and was deleted
    pub removed: bool,
    /// Fresh consensus snapshot after the write
    pub consensus: ConsensusResult,
}

/// Use case for removing a vote
pub struct RemoveVoteUseCase<S: VoteStore> {
    store: Arc<S>,
    authorizer: Arc<dyn VoteAuthorizer>,
    notifier: Arc<dyn ChangeNotifier>,
    clock: Arc<dyn Clock>,
    policy: ConsensusPolicy,
}

impl<S: VoteStore> RemoveVoteUseCase<S> {
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

    pub async fn execute(
        &self,
        input: RemoveVoteInput,
    ) -> Result<RemoveVoteOutput, RemoveVoteError> {
        if !self
            .authorizer
            .can_vote(&input.user_id, &input.trip_id)
            .await?
        {
            return Err(RemoveVoteError::NotAuthorized {
                user_id: input.user_id,
                trip_id: input.trip_id,
            });
        }

        let removed = self
            .store
            .delete_vote(&input.trip_id, &input.activity_id, &input.user_id)
            .await?;
        info!(
            trip_id = %input.trip_id,
            activity_id = %input.activity_id,
            removed,
            "vote removal"
        );

        let consensus = consensus_snapshot(
            self.store.as_ref(),
            &input.trip_id,
            &input.activity_id,
            &self.policy,
            self.clock.now(),
        )
        .await?;

        // Subscribers refresh even on a no-op removal: the payload is the
        // current snapshot either way.
        self.notifier
            .notify(change_event(&input.trip_id, &input.activity_id, &consensus));

        Ok(RemoveVoteOutput { removed, consensus })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::authorizer::AllowAllVoters;
    use crate::ports::change_notifier::NoChangeNotifier;
    use crate::ports::clock::FixedClock;
    use crate::use_cases::cast_vote::{CastVoteInput, CastVoteUseCase};
    use crate::use_cases::test_support::MemStore;
    use chrono::Utc;
    use wayfarer_domain::{ConsensusStatus, VoteType};

    fn remove_uc(store: Arc<MemStore>) -> RemoveVoteUseCase<MemStore> {
        RemoveVoteUseCase::new(
            store,
            Arc::new(AllowAllVoters),
            Arc::new(NoChangeNotifier),
            Arc::new(FixedClock(Utc::now())),
        )
    }

    #[tokio::test]
    async fn test_remove_existing_vote() {
        let store = Arc::new(MemStore::collaborative("trip", &["ana", "ben"]));
        let cast = CastVoteUseCase::new(
            Arc::clone(&store),
            Arc::new(AllowAllVoters),
            Arc::new(NoChangeNotifier),
            Arc::new(FixedClock(Utc::now())),
        );
        cast.execute(CastVoteInput::new("trip", "act", "ana", VoteType::Love))
            .await
            .unwrap();

        let out = remove_uc(Arc::clone(&store))
            .execute(RemoveVoteInput::new("trip", "act", "ana"))
            .await
            .unwrap();

        assert!(out.removed);
        assert_eq!(out.consensus.vote_counts.total(), 0);
        assert_eq!(out.consensus.status, ConsensusStatus::Waiting);
        assert!(store.votes("trip", "act").await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_vote_is_noop() {
        let store = Arc::new(MemStore::collaborative("trip", &["ana", "ben"]));
        let uc = remove_uc(Arc::clone(&store));

        let out = uc
            .execute(RemoveVoteInput::new("trip", "act", "ana"))
            .await
            .unwrap();
        assert!(!out.removed);

        // And again: still no error
        let out = uc
            .execute(RemoveVoteInput::new("trip", "act", "ana"))
            .await
            .unwrap();
        assert!(!out.removed);
    }
}
