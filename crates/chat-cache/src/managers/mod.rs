//! Entity managers
//!
//! Each manager fronts one entity cache. All of them share the client's
//! cache state, so cross-index updates happen under a single lock.

mod channel;
mod guild;
mod relationship;

pub use channel::{
    AddOptions, ChannelManager, FetchOptions, MAX_GROUP_DM_RECIPIENTS, MIN_GROUP_DM_RECIPIENTS,
};
pub use guild::GuildManager;
pub use relationship::RelationshipManager;
