//! Guild and invite payloads as delivered by the network layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ChannelPayload;
use crate::entities::User;
use crate::value_objects::Snowflake;

/// GUILD_CREATE style guild object with its embedded channel lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildPayload {
    pub id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Snowflake>,
    #[serde(default)]
    pub unavailable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<ChannelPayload>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub threads: Vec<ChannelPayload>,
}

/// INVITE_CREATE style invite object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitePayload {
    pub code: String,
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inviter: Option<User>,
    #[serde(default)]
    pub uses: u32,
    /// 0 means unlimited
    #[serde(default)]
    pub max_uses: u32,
    /// Seconds; 0 means never expires
    #[serde(default)]
    pub max_age: u32,
    #[serde(default)]
    pub temporary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
