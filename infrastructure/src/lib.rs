//! Infrastructure layer for wayfarer-consensus
//!
//! Adapters for the application ports: an in-memory vote store (reference
//! implementation, also the backing store for tests and single-process
//! embeddings), a broadcast-channel change notifier, and the file/env
//! configuration loader. Database-backed store adapters live with the
//! embedding product; they only need to implement
//! [`wayfarer_application::VoteStore`].

pub mod config;
pub mod notify;
pub mod store;

// Re-export commonly used types
pub use config::loader::ConfigLoader;
pub use notify::broadcast::BroadcastNotifier;
pub use store::memory::InMemoryVoteStore;
