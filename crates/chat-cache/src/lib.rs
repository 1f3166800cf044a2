//! # chat-cache
//!
//! In-memory entity cache for a chat client session.
//!
//! ## Features
//!
//! - **Collections**: Insertion-ordered stores with optional size limits
//! - **Channel Manager**: Global channel cache with add/remove/fetch and group DMs
//! - **Guild Manager**: Guild cache with per-guild channel and invite views
//! - **Relationships**: Friend lookup used to filter group DM recipients
//! - **Gateway Events**: Typed dispatches applied to the cache
//!
//! ## Example
//!
//! ```ignore
//! use chat_cache::{ClientCache, FetchOptions};
//!
//! let cache = ClientCache::new(&config.cache, http);
//!
//! // Feed gateway dispatches
//! cache.handle_dispatch("GUILD_CREATE", data)?;
//!
//! // Read through the cache, hitting the network on a miss
//! let channel = cache.channels().fetch(channel_id, FetchOptions::default()).await?;
//! ```

pub mod client;
pub mod collection;
pub mod events;
pub mod managers;
pub mod resolver;
mod state;

pub use client::{ClientCache, ClientCacheBuilder};
pub use collection::{CacheOptions, Collection, KeepOverLimit};
pub use events::{
    GatewayEvent, GatewayEventType, GuildDeleteEvent, InviteDeleteEvent, RelationshipEvent,
    ThreadListSyncEvent,
};
pub use managers::{
    AddOptions, ChannelManager, FetchOptions, GuildManager, RelationshipManager,
    MAX_GROUP_DM_RECIPIENTS, MIN_GROUP_DM_RECIPIENTS,
};
pub use resolver::{resolve_channel, ResolveError};
