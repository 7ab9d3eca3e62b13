//! Use cases for the activity voting engine

pub mod activity_status;
pub mod cast_vote;
pub mod remove_vote;
mod shared;
pub mod sweep;

#[cfg(test)]
pub(crate) mod test_support;
