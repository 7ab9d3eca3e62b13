//! Consensus calculation for activity voting
//!
//! Implements the weighted voting system that turns a group's votes on a
//! proposed activity into a single decision status.
//!
//! Decision rules, evaluated strictly in order (first match wins):
//!
//! 1. Participation below the minimum → `Waiting`
//! 2. Score ≥ strong-consensus threshold → `Confirmed` (instant, time-free)
//! 3. Score ≥ 0.5 and the auto-confirm window has elapsed → `Confirmed`
//! 4. Score ≤ rejection threshold → `Rejected`
//! 5. A standing `no` vote past the deadlock window → `Deadlock`
//! 6. Otherwise → `LikelyYes` (score ≥ 0.5) or `Voting`
//!
//! The ordering is load-bearing: a vote set can satisfy several rules at
//! once (e.g. a `no` vote that drags the score below 0.5 but above the
//! rejection threshold still deadlocks after the window), and reordering
//! changes outcomes on boundary cases.

use super::vote::{Vote, VoteCounts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Derived decision status for an activity under vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusStatus {
    /// Not enough collaborators have voted yet
    Waiting,
    /// Voting in progress, no clear trend
    Voting,
    /// Trending positive, not yet confirmed
    LikelyYes,
    /// Group approved
    Confirmed,
    /// Group decided against
    Rejected,
    /// Persistent objection; the trip owner must decide
    Deadlock,
}

impl ConsensusStatus {
    /// Whether this status represents a settled group decision
    pub fn is_settled(&self) -> bool {
        matches!(self, ConsensusStatus::Confirmed | ConsensusStatus::Rejected)
    }

    /// Whether this status requires a manual owner decision
    pub fn needs_owner_decision(&self) -> bool {
        matches!(self, ConsensusStatus::Deadlock)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusStatus::Waiting => "waiting",
            ConsensusStatus::Voting => "voting",
            ConsensusStatus::LikelyYes => "likely_yes",
            ConsensusStatus::Confirmed => "confirmed",
            ConsensusStatus::Rejected => "rejected",
            ConsensusStatus::Deadlock => "deadlock",
        }
    }
}

impl std::fmt::Display for ConsensusStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Thresholds and timing windows for the decision rules
///
/// Defaults match the product rules: 50% participation, instant confirm at
/// score 1.5, auto-confirm after 48h at score 0.5, reject at score −1,
/// deadlock after 72h with a standing objection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusPolicy {
    /// Fraction of eligible voters that must vote before any decision
    pub min_participation: f64,
    /// Average score that confirms instantly, regardless of elapsed time
    pub strong_consensus_score: f64,
    /// Hours after proposal before a moderate majority auto-confirms
    pub auto_confirm_hours: f64,
    /// Hours after proposal before a standing objection escalates
    pub deadlock_hours: f64,
    /// Average score at or below which the activity is rejected
    pub rejection_threshold: f64,
    /// Count votes from users no longer on the eligible roster
    ///
    /// Off by default: votes from removed collaborators are excluded from
    /// score and participation. The filter only applies when the caller
    /// supplies a non-empty roster.
    pub count_orphaned_votes: bool,
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        Self {
            min_participation: 0.5,
            strong_consensus_score: 1.5,
            auto_confirm_hours: 48.0,
            deadlock_hours: 72.0,
            rejection_threshold: -1.0,
            count_orphaned_votes: false,
        }
    }
}

/// Snapshot of the consensus state for one activity
///
/// Derived, never stored: recomputed from the current vote set on every
/// read. Two of its inputs (`now`, elapsed time) change without any vote
/// event, so a cached result goes stale within seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub status: ConsensusStatus,
    /// Average weighted vote value across cast votes
    pub score: f64,
    /// Fraction of eligible voters who have voted (0.0–1.0)
    pub participation: f64,
    /// True iff at least one `no` vote exists
    pub has_strong_objection: bool,
    /// True iff score and elapsed time satisfy an auto-confirm rule
    pub can_auto_confirm: bool,
    pub vote_counts: VoteCounts,
    /// Eligible voter IDs with no current vote
    pub pending_voters: Vec<String>,
}

/// Hours elapsed between two instants (fractional, negative if `now` is
/// before `proposed_at`)
pub fn hours_since(proposed_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - proposed_at).num_milliseconds() as f64 / 3_600_000.0
}

/// Calculate the consensus status for an activity from its current votes
///
/// Pure and total: no I/O, deterministic given its inputs (including
/// `now`), never panics. Tolerates an empty vote set and
/// `total_voters == 0` (participation is defined as 0 in that case).
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use wayfarer_domain::{ConsensusPolicy, ConsensusStatus, Vote, VoteType, calculate_consensus};
///
/// let now = Utc::now();
/// let proposed = now - Duration::hours(1);
/// let voters: Vec<String> = ["ana", "ben", "cleo", "dan"].map(String::from).into();
/// let votes = vec![
///     Vote::new("v1", "t1", "a1", "ana", VoteType::Love, now),
///     Vote::new("v2", "t1", "a1", "ben", VoteType::Love, now),
///     Vote::new("v3", "t1", "a1", "cleo", VoteType::Flexible, now),
/// ];
///
/// let result = calculate_consensus(&votes, 4, proposed, now, &voters, &ConsensusPolicy::default());
/// assert_eq!(result.status, ConsensusStatus::Confirmed);
/// assert_eq!(result.pending_voters, vec!["dan".to_string()]);
/// ```
pub fn calculate_consensus(
    votes: &[Vote],
    total_voters: usize,
    proposed_at: DateTime<Utc>,
    now: DateTime<Utc>,
    eligible_voter_ids: &[String],
    policy: &ConsensusPolicy,
) -> ConsensusResult {
    // Orphan filter: drop votes from users no longer on the roster. Only
    // applies when a roster was supplied, so roster-less callers keep the
    // count-everything behavior.
    let eligible: HashSet<&str> = eligible_voter_ids.iter().map(String::as_str).collect();
    let counted: Vec<&Vote> = votes
        .iter()
        .filter(|v| {
            policy.count_orphaned_votes || eligible.is_empty() || eligible.contains(v.user_id.as_str())
        })
        .collect();

    if counted.is_empty() {
        return ConsensusResult {
            status: ConsensusStatus::Waiting,
            score: 0.0,
            participation: 0.0,
            has_strong_objection: false,
            can_auto_confirm: false,
            vote_counts: VoteCounts::default(),
            pending_voters: eligible_voter_ids.to_vec(),
        };
    }

    let mut total_weight = 0.0;
    let mut has_strong_objection = false;
    let mut vote_counts = VoteCounts::default();
    let mut voted: HashSet<&str> = HashSet::with_capacity(counted.len());

    for vote in &counted {
        total_weight += vote.contribution();
        vote_counts.record(vote.vote_type);
        voted.insert(vote.user_id.as_str());
        if vote.vote_type.is_strong_objection() {
            has_strong_objection = true;
        }
    }

    let participation = if total_voters > 0 {
        counted.len() as f64 / total_voters as f64
    } else {
        0.0
    };
    let score = total_weight / counted.len() as f64;
    let elapsed_hours = hours_since(proposed_at, now);

    let pending_voters: Vec<String> = eligible_voter_ids
        .iter()
        .filter(|id| !voted.contains(id.as_str()))
        .cloned()
        .collect();

    // Rule 1: not enough participation yet
    let (status, can_auto_confirm) = if participation < policy.min_participation {
        (ConsensusStatus::Waiting, false)
    }
    // Rule 2: strong consensus, instant confirm
    else if score >= policy.strong_consensus_score {
        (ConsensusStatus::Confirmed, true)
    }
    // Rule 3: moderate majority plus elapsed time
    else if score >= 0.5 && elapsed_hours >= policy.auto_confirm_hours {
        (ConsensusStatus::Confirmed, true)
    }
    // Rule 4: clear rejection
    else if score <= policy.rejection_threshold {
        (ConsensusStatus::Rejected, false)
    }
    // Rule 5: standing objection past the deadlock window
    else if has_strong_objection && elapsed_hours >= policy.deadlock_hours {
        (ConsensusStatus::Deadlock, false)
    }
    // Rule 6: keep voting, flag a positive trend
    else if score >= 0.5 {
        (ConsensusStatus::LikelyYes, false)
    } else {
        (ConsensusStatus::Voting, false)
    };

    ConsensusResult {
        status,
        score,
        participation,
        has_strong_objection,
        can_auto_confirm,
        vote_counts,
        pending_voters,
    }
}
