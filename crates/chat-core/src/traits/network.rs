//! Ports the cache consumes from the network and relationship layers
//!
//! The cache never performs I/O itself; the session layer provides these.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::payloads::ChannelPayload;
use crate::value_objects::Snowflake;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// REST primitives the channel cache relies on
#[async_trait]
pub trait ChannelHttp: Send + Sync {
    /// GET a channel by id.
    ///
    /// Fails with `DomainError::ChannelNotFound` when the platform reports
    /// the channel does not exist, or `DomainError::Transport` otherwise.
    async fn get_channel(&self, id: Snowflake) -> DomainResult<ChannelPayload>;

    /// POST a group DM creation request for the given recipients
    async fn create_group_dm(&self, recipients: &[Snowflake]) -> DomainResult<ChannelPayload>;
}

/// Read access to the current user's relationships
pub trait RelationshipLookup: Send + Sync {
    /// Check whether `user_id` is a friend of the current user
    fn is_friend(&self, user_id: Snowflake) -> bool;
}
