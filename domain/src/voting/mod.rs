//! Activity voting domain
//!
//! Core concepts for collaborative decision-making on trip activities.
//!
//! - [`vote`] — the four-point vote scale, the validated per-vote weight
//!   multiplier, and the `Vote` entity (one live vote per trip/activity/user).
//! - [`consensus`] — the pure consensus calculator: ordered decision rules
//!   over participation, weighted average score, and elapsed time.
//! - [`status`] — the externally visible voting status, owner override
//!   records, and the solo/collaborative default rule.
//! - [`timing`] — countdown helpers for "auto-confirms in 3h" style UI.

pub mod consensus;
pub mod status;
pub mod timing;
pub mod vote;

// Re-export main types
pub use consensus::{ConsensusPolicy, ConsensusResult, ConsensusStatus, calculate_consensus};
pub use status::{ActivityVotingStatus, ConfirmationMethod, StatusRecord, TripMode};
pub use timing::{TimeRemaining, time_remaining};
pub use vote::{Vote, VoteCounts, VoteError, VoteType, VoteWeight};
