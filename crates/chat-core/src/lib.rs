//! # chat-core
//!
//! Domain layer containing entities, wire payloads, value objects and the
//! ports the client cache consumes. This crate performs no I/O.

pub mod entities;
pub mod error;
pub mod payloads;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    CategoryData, Channel, ChannelData, ChannelShape, ChannelType, DmData, GroupDmData, Guild,
    Invite, RelationshipType, TextData, ThreadData, User, VoiceData,
};
pub use error::DomainError;
pub use payloads::{ChannelPayload, GuildPayload, InvitePayload, ThreadMetadata};
pub use traits::{
    ChannelHttp, ChannelResolvable, DomainResult, RelationshipLookup, UserResolvable,
};
pub use value_objects::{Snowflake, SnowflakeParseError};
