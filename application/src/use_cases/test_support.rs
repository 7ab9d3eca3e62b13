//! In-crate test doubles for the ports
//!
//! A minimal hash-map vote store, a deny-all authorizer, and an event
//! recorder. The production-grade in-memory store lives in
//! `wayfarer-infrastructure`; this one exists so use-case tests stay
//! inside this crate.

use crate::ports::authorizer::{AuthorizerError, VoteAuthorizer};
use crate::ports::change_notifier::{ChangeNotifier, VoteChangeEvent};
use crate::ports::vote_store::{NewVote, VoteStore, VoteStoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use wayfarer_domain::{StatusRecord, TripMode, Vote};

type VoteKey = (String, String, String);
type RecordKey = (String, String);

#[derive(Default)]
struct MemState {
    votes: HashMap<VoteKey, Vote>,
    records: HashMap<RecordKey, StatusRecord>,
    trips: HashMap<String, (TripMode, Vec<String>)>,
    fail_next: bool,
}

/// Hash-map vote store for use-case tests
#[derive(Default)]
pub(crate) struct MemStore {
    state: Mutex<MemState>,
    seq: AtomicU64,
}

impl MemStore {
    pub fn collaborative(trip_id: &str, voter_ids: &[&str]) -> Self {
        let store = Self::default();
        let mut state = store.state.try_lock().expect("fresh store");
        state.trips.insert(
            trip_id.to_string(),
            (
                TripMode::Collaborative,
                voter_ids.iter().map(|s| s.to_string()).collect(),
            ),
        );
        drop(state);
        store
    }

    pub fn solo(trip_id: &str, owner_id: &str) -> Self {
        let store = Self::default();
        let mut state = store.state.try_lock().expect("fresh store");
        state.trips.insert(
            trip_id.to_string(),
            (TripMode::Solo, vec![owner_id.to_string()]),
        );
        drop(state);
        store
    }

    /// Make the next store call fail with a retryable error
    pub async fn fail_next(&self) {
        self.state.lock().await.fail_next = true;
    }

    /// Current votes for an activity (test inspection)
    pub async fn votes(&self, trip_id: &str, activity_id: &str) -> Vec<Vote> {
        self.state
            .lock()
            .await
            .votes
            .values()
            .filter(|v| v.trip_id == trip_id && v.activity_id == activity_id)
            .cloned()
            .collect()
    }

    /// Insert a lifecycle record directly (test setup)
    pub async fn seed_record(&self, record: StatusRecord) {
        let key = (record.trip_id.clone(), record.activity_id.clone());
        self.state.lock().await.records.insert(key, record);
    }

    fn check_failure(state: &mut MemState) -> Result<(), VoteStoreError> {
        if state.fail_next {
            state.fail_next = false;
            return Err(VoteStoreError::Unavailable("injected failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl VoteStore for MemStore {
    async fn list_votes(
        &self,
        trip_id: &str,
        activity_id: &str,
    ) -> Result<Vec<Vote>, VoteStoreError> {
        let mut state = self.state.lock().await;
        Self::check_failure(&mut state)?;
        Ok(state
            .votes
            .values()
            .filter(|v| v.trip_id == trip_id && v.activity_id == activity_id)
            .cloned()
            .collect())
    }

    async fn list_trip_votes(&self, trip_id: &str) -> Result<Vec<Vote>, VoteStoreError> {
        let mut state = self.state.lock().await;
        Self::check_failure(&mut state)?;
        Ok(state
            .votes
            .values()
            .filter(|v| v.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn upsert_vote(&self, ballot: NewVote) -> Result<(Vote, bool), VoteStoreError> {
        let mut state = self.state.lock().await;
        Self::check_failure(&mut state)?;
        let now = Utc::now();
        let key = (
            ballot.trip_id.clone(),
            ballot.activity_id.clone(),
            ballot.user_id.clone(),
        );
        if let Some(existing) = state.votes.get_mut(&key) {
            existing.vote_type = ballot.vote_type;
            existing.comment = ballot.comment;
            existing.weight = ballot.weight;
            existing.updated_at = now;
            return Ok((existing.clone(), true));
        }
        let id = format!("vote-{}", self.seq.fetch_add(1, Ordering::Relaxed));
        let mut vote = Vote::new(
            id,
            &ballot.trip_id,
            &ballot.activity_id,
            &ballot.user_id,
            ballot.vote_type,
            now,
        )
        .with_weight(ballot.weight);
        vote.comment = ballot.comment;
        state.votes.insert(key, vote.clone());
        Ok((vote, false))
    }

    async fn delete_vote(
        &self,
        trip_id: &str,
        activity_id: &str,
        user_id: &str,
    ) -> Result<bool, VoteStoreError> {
        let mut state = self.state.lock().await;
        Self::check_failure(&mut state)?;
        let key = (
            trip_id.to_string(),
            activity_id.to_string(),
            user_id.to_string(),
        );
        Ok(state.votes.remove(&key).is_some())
    }

    async fn list_eligible_voter_ids(&self, trip_id: &str) -> Result<Vec<String>, VoteStoreError> {
        let mut state = self.state.lock().await;
        Self::check_failure(&mut state)?;
        state
            .trips
            .get(trip_id)
            .map(|(_, voters)| voters.clone())
            .ok_or_else(|| VoteStoreError::UnknownTrip(trip_id.to_string()))
    }

    async fn get_status_record(
        &self,
        trip_id: &str,
        activity_id: &str,
    ) -> Result<Option<StatusRecord>, VoteStoreError> {
        let mut state = self.state.lock().await;
        Self::check_failure(&mut state)?;
        Ok(state
            .records
            .get(&(trip_id.to_string(), activity_id.to_string()))
            .cloned())
    }

    async fn put_status_record(&self, record: StatusRecord) -> Result<(), VoteStoreError> {
        let mut state = self.state.lock().await;
        Self::check_failure(&mut state)?;
        let key = (record.trip_id.clone(), record.activity_id.clone());
        state.records.insert(key, record);
        Ok(())
    }

    async fn trip_mode(&self, trip_id: &str) -> Result<TripMode, VoteStoreError> {
        let mut state = self.state.lock().await;
        Self::check_failure(&mut state)?;
        state
            .trips
            .get(trip_id)
            .map(|(mode, _)| *mode)
            .ok_or_else(|| VoteStoreError::UnknownTrip(trip_id.to_string()))
    }
}

/// Authorizer that rejects everyone
pub(crate) struct DenyAll;

#[async_trait]
impl VoteAuthorizer for DenyAll {
    async fn can_vote(&self, _user_id: &str, _trip_id: &str) -> Result<bool, AuthorizerError> {
        Ok(false)
    }
}

/// Notifier that records every emitted event
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    events: StdMutex<Vec<VoteChangeEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<VoteChangeEvent> {
        self.events.lock().expect("notifier lock").clone()
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn notify(&self, event: VoteChangeEvent) {
        self.events.lock().expect("notifier lock").push(event);
    }
}
