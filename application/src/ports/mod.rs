//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement:
//! the durable vote store, role-based vote authorization, change
//! broadcasting, and the clock (injected so time-gated rules are testable).

pub mod authorizer;
pub mod change_notifier;
pub mod clock;
pub mod vote_store;
