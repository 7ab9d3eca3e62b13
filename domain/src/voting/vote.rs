//! Vote types for activity consensus
//!
//! This module defines the voting primitives used when trip collaborators
//! weigh in on a proposed activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced while validating a ballot or a vote weight
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoteError {
    #[error("unknown vote type: {0}. Valid: love, flexible, concerns, no")]
    UnknownVoteType(String),

    #[error("a comment is required when voting \"{0}\"")]
    MissingComment(VoteType),

    #[error("vote weight must be positive, got {0}")]
    InvalidWeight(f64),
}

/// A collaborator's opinion on a proposed activity
///
/// The four-point scale maps to fixed score contributions:
///
/// | type | weight |
/// |------|--------|
/// | love | +2 |
/// | flexible | +1 |
/// | concerns | −1 |
/// | no | −2 |
///
/// # Example
///
/// ```
/// use wayfarer_domain::VoteType;
///
/// assert_eq!(VoteType::Love.weight(), 2.0);
/// assert!(VoteType::No.requires_comment());
/// assert_eq!("flexible".parse::<VoteType>().ok(), Some(VoteType::Flexible));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    /// Strong positive
    Love,
    /// Weak positive
    Flexible,
    /// Weak negative, must be explained
    Concerns,
    /// Strong negative (veto power), must be explained
    No,
}

impl VoteType {
    /// Fixed score contribution for this vote type
    pub fn weight(&self) -> f64 {
        match self {
            VoteType::Love => 2.0,
            VoteType::Flexible => 1.0,
            VoteType::Concerns => -1.0,
            VoteType::No => -2.0,
        }
    }

    /// Negative votes must carry an explanation for the rest of the group
    pub fn requires_comment(&self) -> bool {
        matches!(self, VoteType::Concerns | VoteType::No)
    }

    /// A `no` vote is a standing objection that can force a deadlock
    pub fn is_strong_objection(&self) -> bool {
        matches!(self, VoteType::No)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Love => "love",
            VoteType::Flexible => "flexible",
            VoteType::Concerns => "concerns",
            VoteType::No => "no",
        }
    }
}

impl std::fmt::Display for VoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteType {
    type Err = VoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "love" => Ok(VoteType::Love),
            "flexible" => Ok(VoteType::Flexible),
            "concerns" => Ok(VoteType::Concerns),
            "no" => Ok(VoteType::No),
            other => Err(VoteError::UnknownVoteType(other.to_string())),
        }
    }
}

/// Per-vote weight multiplier, strictly positive
///
/// Reserved for weighted roles (e.g. giving the trip owner 1.5x). The
/// constructor rejects zero, negative, and non-finite values so a bad
/// multiplier can never silently corrupt the score average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct VoteWeight(f64);

impl VoteWeight {
    /// Create a validated weight multiplier
    pub fn new(value: f64) -> Result<Self, VoteError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(VoteError::InvalidWeight(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for VoteWeight {
    fn default() -> Self {
        Self(1.0)
    }
}

impl TryFrom<f64> for VoteWeight {
    type Error = VoteError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VoteWeight> for f64 {
    fn from(weight: VoteWeight) -> f64 {
        weight.0
    }
}

/// One collaborator's current vote on one activity
///
/// Invariant: at most one live `Vote` per `(trip_id, activity_id, user_id)`.
/// Re-voting replaces the prior vote in place (same `id`, updated fields,
/// fresh `updated_at`); it never appends a second record. `voted_at` is set
/// once at first cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: String,
    pub trip_id: String,
    pub activity_id: String,
    pub user_id: String,
    pub vote_type: VoteType,
    /// Required (non-empty) for `concerns` and `no`
    pub comment: Option<String>,
    /// Positive multiplier, default 1.0
    #[serde(default)]
    pub weight: VoteWeight,
    pub voted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vote {
    /// Create a new vote with default weight, stamped at `now`
    pub fn new(
        id: impl Into<String>,
        trip_id: impl Into<String>,
        activity_id: impl Into<String>,
        user_id: impl Into<String>,
        vote_type: VoteType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            trip_id: trip_id.into(),
            activity_id: activity_id.into(),
            user_id: user_id.into(),
            vote_type,
            comment: None,
            weight: VoteWeight::default(),
            voted_at: now,
            updated_at: now,
        }
    }

    /// Attach a comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Override the weight multiplier
    pub fn with_weight(mut self, weight: VoteWeight) -> Self {
        self.weight = weight;
        self
    }

    /// This vote's contribution to the weighted score sum
    pub fn contribution(&self) -> f64 {
        self.vote_type.weight() * self.weight.value()
    }
}

/// Validate a ballot before it reaches the vote store
///
/// Enforces the comment invariant: `concerns` and `no` ballots must carry a
/// non-empty comment. Whitespace-only comments count as missing.
pub fn validate_ballot(vote_type: VoteType, comment: Option<&str>) -> Result<(), VoteError> {
    if vote_type.requires_comment() && comment.map_or(true, |c| c.trim().is_empty()) {
        return Err(VoteError::MissingComment(vote_type));
    }
    Ok(())
}

/// Tally of votes by type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    pub love: usize,
    pub flexible: usize,
    pub concerns: usize,
    pub no: usize,
}

impl VoteCounts {
    /// Count one vote of the given type
    pub fn record(&mut self, vote_type: VoteType) {
        match vote_type {
            VoteType::Love => self.love += 1,
            VoteType::Flexible => self.flexible += 1,
            VoteType::Concerns => self.concerns += 1,
            VoteType::No => self.no += 1,
        }
    }

    /// Tally an entire vote set
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> Self {
        let mut counts = Self::default();
        for vote in votes {
            counts.record(vote.vote_type);
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.love + self.flexible + self.concerns + self.no
    }
}

/// Find a user's current vote in a vote set
pub fn find_user_vote<'a>(votes: &'a [Vote], user_id: &str) -> Option<&'a Vote> {
    votes.iter().find(|v| v.user_id == user_id)
}

/// Group a trip-wide vote list by activity (for batch consensus reads)
pub fn group_votes_by_activity(votes: Vec<Vote>) -> HashMap<String, Vec<Vote>> {
    let mut map: HashMap<String, Vec<Vote>> = HashMap::new();
    for vote in votes {
        map.entry(vote.activity_id.clone()).or_default().push(vote);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_vote_type_weights() {
        assert_eq!(VoteType::Love.weight(), 2.0);
        assert_eq!(VoteType::Flexible.weight(), 1.0);
        assert_eq!(VoteType::Concerns.weight(), -1.0);
        assert_eq!(VoteType::No.weight(), -2.0);
    }

    #[test]
    fn test_vote_type_parse() {
        assert_eq!("love".parse::<VoteType>().ok(), Some(VoteType::Love));
        assert_eq!("no".parse::<VoteType>().ok(), Some(VoteType::No));
        assert!(matches!(
            "maybe".parse::<VoteType>(),
            Err(VoteError::UnknownVoteType(_))
        ));
    }

    #[test]
    fn test_vote_type_serde_lowercase() {
        assert_eq!(serde_json::to_string(&VoteType::Love).unwrap(), "\"love\"");
        let parsed: VoteType = serde_json::from_str("\"concerns\"").unwrap();
        assert_eq!(parsed, VoteType::Concerns);
    }

    #[test]
    fn test_weight_rejects_non_positive() {
        assert!(VoteWeight::new(0.0).is_err());
        assert!(VoteWeight::new(-1.5).is_err());
        assert!(VoteWeight::new(f64::NAN).is_err());
        assert!(VoteWeight::new(1.5).is_ok());
        assert_eq!(VoteWeight::default().value(), 1.0);
    }

    #[test]
    fn test_contribution_applies_multiplier() {
        let vote = Vote::new("v1", "t1", "a1", "u1", VoteType::Love, t0())
            .with_weight(VoteWeight::new(1.5).unwrap());
        assert_eq!(vote.contribution(), 3.0);
    }

    #[test]
    fn test_ballot_comment_required_for_negative_votes() {
        assert!(validate_ballot(VoteType::Love, None).is_ok());
        assert!(validate_ballot(VoteType::Flexible, None).is_ok());
        assert_eq!(
            validate_ballot(VoteType::Concerns, None),
            Err(VoteError::MissingComment(VoteType::Concerns))
        );
        assert_eq!(
            validate_ballot(VoteType::No, Some("   ")),
            Err(VoteError::MissingComment(VoteType::No))
        );
        assert!(validate_ballot(VoteType::No, Some("too far from the hotel")).is_ok());
    }

    #[test]
    fn test_vote_counts_tally() {
        let votes = vec![
            Vote::new("v1", "t", "a", "u1", VoteType::Love, t0()),
            Vote::new("v2", "t", "a", "u2", VoteType::Love, t0()),
            Vote::new("v3", "t", "a", "u3", VoteType::Concerns, t0()).with_comment("pricey"),
        ];
        let counts = VoteCounts::from_votes(&votes);
        assert_eq!(counts.love, 2);
        assert_eq!(counts.concerns, 1);
        assert_eq!(counts.no, 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_find_user_vote() {
        let votes = vec![
            Vote::new("v1", "t", "a", "u1", VoteType::Love, t0()),
            Vote::new("v2", "t", "a", "u2", VoteType::No, t0()).with_comment("nope"),
        ];
        assert_eq!(find_user_vote(&votes, "u2").map(|v| v.vote_type), Some(VoteType::No));
        assert!(find_user_vote(&votes, "u3").is_none());
    }

    #[test]
    fn test_group_votes_by_activity() {
        let votes = vec![
            Vote::new("v1", "t", "a1", "u1", VoteType::Love, t0()),
            Vote::new("v2", "t", "a2", "u1", VoteType::Flexible, t0()),
            Vote::new("v3", "t", "a1", "u2", VoteType::Flexible, t0()),
        ];
        let grouped = group_votes_by_activity(votes);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["a1"].len(), 2);
        assert_eq!(grouped["a2"].len(), 1);
    }
}
