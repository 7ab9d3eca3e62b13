//! Port for durable vote storage
//!
//! The store keeps one live vote per `(trip, activity, user)` with
//! replace-on-revote semantics, plus the per-activity lifecycle records and
//! the trip roster. Concurrent upserts for different users must never
//! conflict; concurrent upserts for the same user resolve last-write-wins
//! on `updated_at`.

use async_trait::async_trait;
use thiserror::Error;
use wayfarer_domain::{StatusRecord, TripMode, Vote, VoteType, VoteWeight};

/// Errors surfaced by vote store adapters
#[derive(Error, Debug, Clone)]
pub enum VoteStoreError {
    /// Transient I/O failure; the caller may retry
    #[error("vote store unavailable: {0}")]
    Unavailable(String),

    /// The referenced trip does not exist
    #[error("unknown trip: {0}")]
    UnknownTrip(String),
}

impl VoteStoreError {
    /// Whether the caller should retry rather than surface the error
    pub fn is_retryable(&self) -> bool {
        matches!(self, VoteStoreError::Unavailable(_))
    }
}

/// A ballot to upsert: everything except the store-assigned id/timestamps
#[derive(Debug, Clone)]
pub struct NewVote {
    pub trip_id: String,
    pub activity_id: String,
    pub user_id: String,
    pub vote_type: VoteType,
    pub comment: Option<String>,
    pub weight: VoteWeight,
}

impl NewVote {
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
}

/// Port for the durable vote store
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// All current votes for one activity
    async fn list_votes(
        &self,
        trip_id: &str,
        activity_id: &str,
    ) -> Result<Vec<Vote>, VoteStoreError>;

    /// All current votes across a trip (batch consensus reads)
    async fn list_trip_votes(&self, trip_id: &str) -> Result<Vec<Vote>, VoteStoreError>;

    /// Insert or replace the user's vote on an activity
    ///
    /// Keyed by `(trip_id, activity_id, user_id)`: a re-vote updates the
    /// existing record in place (same id, fresh `updated_at`) and never
    /// creates a duplicate. Returns the stored vote and whether it was an
    /// update of a prior vote.
    async fn upsert_vote(&self, ballot: NewVote) -> Result<(Vote, bool), VoteStoreError>;

    /// Delete the user's vote if present; Ok(false) when absent
    async fn delete_vote(
        &self,
        trip_id: &str,
        activity_id: &str,
        user_id: &str,
    ) -> Result<bool, VoteStoreError>;

    /// Owner plus collaborators with vote-capable roles
    async fn list_eligible_voter_ids(&self, trip_id: &str) -> Result<Vec<String>, VoteStoreError>;

    /// The activity's lifecycle record, if one was written
    async fn get_status_record(
        &self,
        trip_id: &str,
        activity_id: &str,
    ) -> Result<Option<StatusRecord>, VoteStoreError>;

    /// Write (or replace) an activity's lifecycle record
    async fn put_status_record(&self, record: StatusRecord) -> Result<(), VoteStoreError>;

    /// Whether the trip is solo or collaborative
    async fn trip_mode(&self, trip_id: &str) -> Result<TripMode, VoteStoreError>;
}
