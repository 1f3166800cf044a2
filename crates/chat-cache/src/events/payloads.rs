//! Event payloads that are not plain entity objects

use chat_core::{ChannelPayload, RelationshipType, Snowflake};
use serde::{Deserialize, Serialize};

/// GUILD_DELETE payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildDeleteEvent {
    pub id: Snowflake,
    /// Set during an outage; the guild stays cached
    #[serde(default)]
    pub unavailable: bool,
}

/// THREAD_LIST_SYNC payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadListSyncEvent {
    pub guild_id: Snowflake,
    /// Parents being synced; absent means every channel in the guild
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_ids: Option<Vec<Snowflake>>,
    #[serde(default)]
    pub threads: Vec<ChannelPayload>,
}

/// INVITE_DELETE payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteDeleteEvent {
    pub code: String,
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
}

/// RELATIONSHIP_ADD / RELATIONSHIP_REMOVE payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEvent {
    pub id: Snowflake,
    #[serde(rename = "type", default)]
    pub kind: RelationshipType,
}
