//! Domain layer for wayfarer-consensus
//!
//! This crate contains the core business logic for collaborative activity
//! voting: the vote data model, the consensus calculator, and the status
//! lifecycle types. It has no dependencies on infrastructure or transport
//! concerns.
//!
//! # Core Concepts
//!
//! ## Consensus
//!
//! Trip collaborators cast weighted votes (`love`/`flexible`/`concerns`/`no`)
//! on a proposed activity. The consensus calculator folds the current vote
//! set into a single deterministic [`ConsensusResult`] using participation
//! thresholds, score thresholds, and time-based escalation rules.
//!
//! ## Lifecycle
//!
//! The externally visible [`ActivityVotingStatus`] layers an optional owner
//! override record on top of the computed status, and defines what "no
//! record yet" means for solo versus collaborative trips.

pub mod voting;

// Re-export commonly used types
pub use voting::{
    consensus::{ConsensusPolicy, ConsensusResult, ConsensusStatus, calculate_consensus, hours_since},
    status::{ActivityVotingStatus, ConfirmationMethod, StatusRecord, TripMode},
    timing::{TimeRemaining, time_remaining},
    vote::{
        Vote, VoteCounts, VoteError, VoteType, VoteWeight, find_user_vote,
        group_votes_by_activity, validate_ballot,
    },
};
