//! Channel payload as delivered by the network layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::{ChannelType, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Raw channel object from a REST response or a gateway dispatch.
///
/// Every field beyond `id` and `type` is optional: the platform omits fields
/// that do not apply to a channel type, and partial payloads carry only the
/// identifying fields.
///
/// Fields the platform can clear are `Option<Option<T>>`: `None` when the
/// field is missing, `Some(None)` for an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPayload {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: ChannelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<Snowflake>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub topic: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<bool>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<Option<Snowflake>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_per_user: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_limit: Option<u32>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub rtc_region: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Option<Snowflake>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub icon: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_metadata: Option<ThreadMetadata>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Thread-specific fields nested in a thread channel payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMetadata {
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_archive_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_timestamp: Option<DateTime<Utc>>,
}

impl ChannelPayload {
    /// Create a bare payload carrying only the identifying fields
    #[must_use]
    pub fn bare(id: Snowflake, kind: ChannelType) -> Self {
        Self {
            id,
            kind,
            ..Self::default()
        }
    }

    /// Decode a payload from untyped JSON
    pub fn from_value(value: serde_json::Value) -> Result<Self, DomainError> {
        serde_json::from_value(value).map_err(|e| DomainError::Decode(e.to_string()))
    }

    /// Set the containing guild
    #[must_use]
    pub fn with_guild(mut self, guild_id: Snowflake) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    /// Set the parent (category or thread parent)
    #[must_use]
    pub fn with_parent(mut self, parent_id: Snowflake) -> Self {
        self.parent_id = Some(Some(parent_id));
        self
    }

    /// Clear the parent, as when a channel leaves its category
    #[must_use]
    pub fn without_parent(mut self) -> Self {
        self.parent_id = Some(None);
        self
    }

    /// Set the channel name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Some(name.into()));
        self
    }

    /// Check whether the payload carries nothing beyond id, type, guild and parent.
    ///
    /// Records built from a bare payload are partial.
    pub fn is_bare(&self) -> bool {
        self.name.is_none()
            && self.position.is_none()
            && self.topic.is_none()
            && self.nsfw.is_none()
            && self.last_message_id.is_none()
            && self.rate_limit_per_user.is_none()
            && self.bitrate.is_none()
            && self.user_limit.is_none()
            && self.rtc_region.is_none()
            && self.owner_id.is_none()
            && self.icon.is_none()
            && self.recipients.is_none()
            && self.message_count.is_none()
            && self.member_count.is_none()
            && self.thread_metadata.is_none()
    }

    /// Parent id, if the payload names one
    pub fn parent(&self) -> Option<Snowflake> {
        self.parent_id.flatten()
    }

    /// Recipient ids, if the payload lists recipients
    pub fn recipient_ids(&self) -> Option<Vec<Snowflake>> {
        self.recipients
            .as_ref()
            .map(|users| users.iter().map(|u| u.id).collect())
    }
}
