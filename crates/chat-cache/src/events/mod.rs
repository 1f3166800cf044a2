//! Gateway events
//!
//! Typed dispatch events that feed the cache. Decoding is separate from
//! applying them; see `ClientCache::handle`.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{GuildDeleteEvent, InviteDeleteEvent, RelationshipEvent, ThreadListSyncEvent};

use chat_core::{ChannelPayload, DomainError, GuildPayload, InvitePayload};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A decoded dispatch event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    GuildCreate(GuildPayload),
    GuildDelete(GuildDeleteEvent),
    ChannelCreate(ChannelPayload),
    ChannelUpdate(ChannelPayload),
    ChannelDelete(ChannelPayload),
    ThreadCreate(ChannelPayload),
    ThreadUpdate(ChannelPayload),
    ThreadDelete(ChannelPayload),
    ThreadListSync(ThreadListSyncEvent),
    InviteCreate(InvitePayload),
    InviteDelete(InviteDeleteEvent),
    RelationshipAdd(RelationshipEvent),
    RelationshipRemove(RelationshipEvent),
}

impl GatewayEvent {
    /// Decode the `d` field of a dispatch named `name`.
    ///
    /// Events the cache does not consume decode to `None`.
    ///
    /// # Errors
    /// `DomainError::Decode` when a consumed event carries a malformed body
    pub fn from_dispatch(name: &str, data: Value) -> Result<Option<Self>, DomainError> {
        let Some(kind) = GatewayEventType::from_str(name) else {
            return Ok(None);
        };

        let event = match kind {
            GatewayEventType::GuildCreate => Self::GuildCreate(decode(kind, data)?),
            GatewayEventType::GuildDelete => Self::GuildDelete(decode(kind, data)?),
            GatewayEventType::ChannelCreate => Self::ChannelCreate(decode(kind, data)?),
            GatewayEventType::ChannelUpdate => Self::ChannelUpdate(decode(kind, data)?),
            GatewayEventType::ChannelDelete => Self::ChannelDelete(decode(kind, data)?),
            GatewayEventType::ThreadCreate => Self::ThreadCreate(decode(kind, data)?),
            GatewayEventType::ThreadUpdate => Self::ThreadUpdate(decode(kind, data)?),
            GatewayEventType::ThreadDelete => Self::ThreadDelete(decode(kind, data)?),
            GatewayEventType::ThreadListSync => Self::ThreadListSync(decode(kind, data)?),
            GatewayEventType::InviteCreate => Self::InviteCreate(decode(kind, data)?),
            GatewayEventType::InviteDelete => Self::InviteDelete(decode(kind, data)?),
            GatewayEventType::RelationshipAdd => Self::RelationshipAdd(decode(kind, data)?),
            GatewayEventType::RelationshipRemove => Self::RelationshipRemove(decode(kind, data)?),
        };
        Ok(Some(event))
    }

    /// The event's dispatch name
    #[must_use]
    pub fn kind(&self) -> GatewayEventType {
        match self {
            Self::GuildCreate(_) => GatewayEventType::GuildCreate,
            Self::GuildDelete(_) => GatewayEventType::GuildDelete,
            Self::ChannelCreate(_) => GatewayEventType::ChannelCreate,
            Self::ChannelUpdate(_) => GatewayEventType::ChannelUpdate,
            Self::ChannelDelete(_) => GatewayEventType::ChannelDelete,
            Self::ThreadCreate(_) => GatewayEventType::ThreadCreate,
            Self::ThreadUpdate(_) => GatewayEventType::ThreadUpdate,
            Self::ThreadDelete(_) => GatewayEventType::ThreadDelete,
            Self::ThreadListSync(_) => GatewayEventType::ThreadListSync,
            Self::InviteCreate(_) => GatewayEventType::InviteCreate,
            Self::InviteDelete(_) => GatewayEventType::InviteDelete,
            Self::RelationshipAdd(_) => GatewayEventType::RelationshipAdd,
            Self::RelationshipRemove(_) => GatewayEventType::RelationshipRemove,
        }
    }
}

fn decode<T: DeserializeOwned>(kind: GatewayEventType, data: Value) -> Result<T, DomainError> {
    serde_json::from_value(data).map_err(|e| DomainError::Decode(format!("{kind}: {e}")))
}
