//! Port for vote authorization
//!
//! Role checks live outside this core: the adapter decides whether a user
//! holds a vote-capable role on a trip (owner, editor, or voter). Reading
//! consensus results needs no vote rights and never goes through this port.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the authorization adapter
#[derive(Error, Debug, Clone)]
pub enum AuthorizerError {
    /// Transient lookup failure; the caller may retry
    #[error("authorization lookup failed: {0}")]
    Unavailable(String),
}

/// Port for role-based vote authorization
#[async_trait]
pub trait VoteAuthorizer: Send + Sync {
    /// Whether the user may cast or remove votes on this trip
    async fn can_vote(&self, user_id: &str, trip_id: &str) -> Result<bool, AuthorizerError>;
}

/// Permits everyone; for tests and single-tenant embeddings
pub struct AllowAllVoters;

#[async_trait]
impl VoteAuthorizer for AllowAllVoters {
    async fn can_vote(&self, _user_id: &str, _trip_id: &str) -> Result<bool, AuthorizerError> {
        Ok(true)
    }
}
