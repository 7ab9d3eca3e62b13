//! Status lifecycle types for activity voting
//!
//! The consensus calculator produces a [`ConsensusStatus`]; this module
//! defines what the rest of the product actually observes. An optional
//! persisted [`StatusRecord`] (e.g. an owner manually confirming despite
//! the computed consensus) layers over the computed status, and the
//! *absence* of a record is itself a defined default that depends on
//! whether the trip is collaborative.

use super::consensus::ConsensusStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Externally visible voting status for an activity
///
/// Same shape as [`ConsensusStatus`], but sourced from the lifecycle layer:
/// override records and trip-mode defaults apply here, never inside the
/// calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityVotingStatus {
    Waiting,
    Voting,
    LikelyYes,
    Confirmed,
    Rejected,
    Deadlock,
}

impl From<ConsensusStatus> for ActivityVotingStatus {
    fn from(status: ConsensusStatus) -> Self {
        match status {
            ConsensusStatus::Waiting => ActivityVotingStatus::Waiting,
            ConsensusStatus::Voting => ActivityVotingStatus::Voting,
            ConsensusStatus::LikelyYes => ActivityVotingStatus::LikelyYes,
            ConsensusStatus::Confirmed => ActivityVotingStatus::Confirmed,
            ConsensusStatus::Rejected => ActivityVotingStatus::Rejected,
            ConsensusStatus::Deadlock => ActivityVotingStatus::Deadlock,
        }
    }
}

impl ActivityVotingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityVotingStatus::Waiting => "waiting",
            ActivityVotingStatus::Voting => "voting",
            ActivityVotingStatus::LikelyYes => "likely_yes",
            ActivityVotingStatus::Confirmed => "confirmed",
            ActivityVotingStatus::Rejected => "rejected",
            ActivityVotingStatus::Deadlock => "deadlock",
        }
    }
}

impl std::fmt::Display for ActivityVotingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an activity reached its settled status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationMethod {
    Unanimous,
    Majority,
    AutoConfirm,
    OwnerOverride,
    Timeout,
}

/// Persisted lifecycle record for an activity
///
/// Written when an activity enters voting (carrying `proposed_at`, the
/// anchor for all elapsed-time rules) and when an owner overrides the
/// computed consensus. An override is terminal until voting is explicitly
/// re-opened; nothing re-opens it automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub trip_id: String,
    pub activity_id: String,
    pub status: ActivityVotingStatus,
    pub proposed_by: Option<String>,
    /// When the activity entered voting; never changes on re-votes
    pub proposed_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub confirmation_method: Option<ConfirmationMethod>,
}

impl StatusRecord {
    /// Open a voting round for an activity
    pub fn proposed(
        trip_id: impl Into<String>,
        activity_id: impl Into<String>,
        proposed_by: Option<String>,
        proposed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            activity_id: activity_id.into(),
            status: ActivityVotingStatus::Voting,
            proposed_by,
            proposed_at,
            confirmed_at: None,
            rejected_at: None,
            confirmation_method: None,
        }
    }

    /// Owner manually settles the activity, overriding the computed status
    pub fn owner_override(mut self, confirmed: bool, at: DateTime<Utc>) -> Self {
        if confirmed {
            self.status = ActivityVotingStatus::Confirmed;
            self.confirmed_at = Some(at);
        } else {
            self.status = ActivityVotingStatus::Rejected;
            self.rejected_at = Some(at);
        }
        self.confirmation_method = Some(ConfirmationMethod::OwnerOverride);
        self
    }

    /// Whether this record pins the status regardless of computed consensus
    pub fn is_override(&self) -> bool {
        matches!(
            self.confirmation_method,
            Some(ConfirmationMethod::OwnerOverride)
        )
    }
}

/// Whether a trip is planned alone or with collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripMode {
    /// Single planner; activities need no approval
    #[default]
    Solo,
    /// Multiple collaborators; activities are gated by voting
    Collaborative,
}

impl TripMode {
    pub fn is_collaborative(&self) -> bool {
        matches!(self, TripMode::Collaborative)
    }

    /// Status of an activity with no record and no votes
    ///
    /// Solo trips auto-confirm; collaborative trips start in `Voting` (not
    /// `Waiting`) so the UI invites participation instead of looking
    /// frozen. A product decision, deliberately applied here in the
    /// lifecycle layer and not in the calculator.
    pub fn default_status(&self) -> ActivityVotingStatus {
        match self {
            TripMode::Solo => ActivityVotingStatus::Confirmed,
            TripMode::Collaborative => ActivityVotingStatus::Voting,
        }
    }
}
