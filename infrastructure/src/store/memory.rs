//! In-memory vote store
//!
//! Reference implementation of the [`VoteStore`] port: a process-local
//! store keyed exactly as the port contract requires, with one live vote
//! per `(trip, activity, user)` and replace-on-revote semantics. Writers
//! serialize on a single `RwLock`, which gives last-write-wins on
//! `updated_at` for concurrent re-votes by the same user while upserts for
//! different users never conflict.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;
use wayfarer_application::{NewVote, VoteStore, VoteStoreError};
use wayfarer_domain::{StatusRecord, TripMode, Vote};

type VoteKey = (String, String, String);
type RecordKey = (String, String);

#[derive(Debug, Clone)]
struct TripEntry {
    mode: TripMode,
    voter_ids: Vec<String>,
}

#[derive(Default)]
struct Tables {
    votes: HashMap<VoteKey, Vote>,
    records: HashMap<RecordKey, StatusRecord>,
    trips: HashMap<String, TripEntry>,
}

/// Process-local [`VoteStore`] implementation
#[derive(Default)]
pub struct InMemoryVoteStore {
    tables: RwLock<Tables>,
}

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trip with its mode and vote-capable roster
    ///
    /// The roster is the owner plus collaborators whose role carries vote
    /// rights; viewers never appear here.
    pub async fn register_trip(
        &self,
        trip_id: impl Into<String>,
        mode: TripMode,
        voter_ids: Vec<String>,
    ) {
        let trip_id = trip_id.into();
        let mut tables = self.tables.write().await;
        tables.trips.insert(trip_id, TripEntry { mode, voter_ids });
    }

    /// Replace a trip's vote-capable roster (collaborators joined or left)
    pub async fn set_voter_ids(
        &self,
        trip_id: &str,
        voter_ids: Vec<String>,
    ) -> Result<(), VoteStoreError> {
        let mut tables = self.tables.write().await;
        match tables.trips.get_mut(trip_id) {
            Some(entry) => {
                entry.voter_ids = voter_ids;
                Ok(())
            }
            None => Err(VoteStoreError::UnknownTrip(trip_id.to_string())),
        }
    }
}

#[async_trait]
impl VoteStore for InMemoryVoteStore {
    async fn list_votes(
        &self,
        trip_id: &str,
        activity_id: &str,
    ) -> Result<Vec<Vote>, VoteStoreError> {
        let tables = self.tables.read().await;
        let mut votes: Vec<Vote> = tables
            .votes
            .values()
            .filter(|v| v.trip_id == trip_id && v.activity_id == activity_id)
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.voted_at.cmp(&b.voted_at));
        Ok(votes)
    }

    async fn list_trip_votes(&self, trip_id: &str) -> Result<Vec<Vote>, VoteStoreError> {
        let tables = self.tables.read().await;
        let mut votes: Vec<Vote> = tables
            .votes
            .values()
            .filter(|v| v.trip_id == trip_id)
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.voted_at.cmp(&b.voted_at));
        Ok(votes)
    }

    async fn upsert_vote(&self, ballot: NewVote) -> Result<(Vote, bool), VoteStoreError> {
        let mut tables = self.tables.write().await;
        if !tables.trips.contains_key(&ballot.trip_id) {
            return Err(VoteStoreError::UnknownTrip(ballot.trip_id));
        }

        let now = Utc::now();
        let key = (
            ballot.trip_id.clone(),
            ballot.activity_id.clone(),
            ballot.user_id.clone(),
        );

        if let Some(existing) = tables.votes.get_mut(&key) {
            // Re-vote: same id, voted_at untouched, fresh updated_at
            existing.vote_type = ballot.vote_type;
            existing.comment = ballot.comment;
            existing.weight = ballot.weight;
            existing.updated_at = now;
            debug!(vote_id = %existing.id, "vote updated in place");
            return Ok((existing.clone(), true));
        }

        let mut vote = Vote::new(
            Uuid::new_v4().to_string(),
            &ballot.trip_id,
            &ballot.activity_id,
            &ballot.user_id,
            ballot.vote_type,
            now,
        )
        .with_weight(ballot.weight);
        vote.comment = ballot.comment;
        tables.votes.insert(key, vote.clone());
        Ok((vote, false))
    }

    async fn delete_vote(
        &self,
        trip_id: &str,
        activity_id: &str,
        user_id: &str,
    ) -> Result<bool, VoteStoreError> {
        let mut tables = self.tables.write().await;
        let key = (
            trip_id.to_string(),
            activity_id.to_string(),
            user_id.to_string(),
        );
        Ok(tables.votes.remove(&key).is_some())
    }

    async fn list_eligible_voter_ids(&self, trip_id: &str) -> Result<Vec<String>, VoteStoreError> {
        let tables = self.tables.read().await;
        tables
            .trips
            .get(trip_id)
            .map(|entry| entry.voter_ids.clone())
            .ok_or_else(|| VoteStoreError::UnknownTrip(trip_id.to_string()))
    }

    async fn get_status_record(
        &self,
        trip_id: &str,
        activity_id: &str,
    ) -> Result<Option<StatusRecord>, VoteStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .records
            .get(&(trip_id.to_string(), activity_id.to_string()))
            .cloned())
    }

    async fn put_status_record(&self, record: StatusRecord) -> Result<(), VoteStoreError> {
        let mut tables = self.tables.write().await;
        let key = (record.trip_id.clone(), record.activity_id.clone());
        tables.records.insert(key, record);
        Ok(())
    }

    async fn trip_mode(&self, trip_id: &str) -> Result<TripMode, VoteStoreError> {
        let tables = self.tables.read().await;
        tables
            .trips
            .get(trip_id)
            .map(|entry| entry.mode)
            .ok_or_else(|| VoteStoreError::UnknownTrip(trip_id.to_string()))
    }
}
