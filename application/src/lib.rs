//! Application layer for wayfarer-consensus
//!
//! This crate contains use cases, port definitions, and application
//! configuration for the activity voting engine. It depends only on the
//! domain layer; adapters for the ports live in
//! `wayfarer-infrastructure` or in the embedding product.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::VotingConfig;
pub use ports::{
    authorizer::{AllowAllVoters, AuthorizerError, VoteAuthorizer},
    change_notifier::{ChangeNotifier, NoChangeNotifier, VoteChangeEvent},
    clock::{Clock, FixedClock, SystemClock},
    vote_store::{NewVote, VoteStore, VoteStoreError},
};
pub use use_cases::activity_status::ActivityStatusUseCase;
pub use use_cases::cast_vote::{CastVoteError, CastVoteInput, CastVoteOutput, CastVoteUseCase};
pub use use_cases::remove_vote::{
    RemoveVoteError, RemoveVoteInput, RemoveVoteOutput, RemoveVoteUseCase,
};
pub use use_cases::sweep::ConsensusSweep;
