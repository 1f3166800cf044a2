//! Channel entity - text, voice, category, thread, DM or group DM

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payloads::ChannelPayload;
use crate::value_objects::Snowflake;

/// Channel type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "i16", into = "i16")]
pub enum ChannelType {
    /// Guild text channel
    #[default]
    GuildText,
    /// Direct message between users
    Dm,
    /// Guild voice channel
    GuildVoice,
    /// Direct message between multiple users
    GroupDm,
    /// Guild category for organizing channels
    GuildCategory,
    /// Announcement channel that users can follow
    GuildNews,
    /// Store channel (retired by the platform)
    GuildStore,
    /// Thread inside an announcement channel
    GuildNewsThread,
    /// Public thread inside a text or forum channel
    GuildPublicThread,
    /// Private thread inside a text channel
    GuildPrivateThread,
    /// Stage voice channel
    GuildStageVoice,
    /// Student hub directory
    GuildDirectory,
    /// Forum channel that only contains threads
    GuildForum,
    /// Discriminator this client does not know
    Unknown(i16),
}

impl ChannelType {
    /// Get the numeric value
    #[inline]
    #[must_use]
    pub fn as_i16(self) -> i16 {
        match self {
            Self::GuildText => 0,
            Self::Dm => 1,
            Self::GuildVoice => 2,
            Self::GroupDm => 3,
            Self::GuildCategory => 4,
            Self::GuildNews => 5,
            Self::GuildStore => 6,
            Self::GuildNewsThread => 10,
            Self::GuildPublicThread => 11,
            Self::GuildPrivateThread => 12,
            Self::GuildStageVoice => 13,
            Self::GuildDirectory => 14,
            Self::GuildForum => 15,
            Self::Unknown(value) => value,
        }
    }

    /// Check if this is one of the thread types
    #[inline]
    #[must_use]
    pub fn is_thread(self) -> bool {
        matches!(
            self,
            Self::GuildNewsThread | Self::GuildPublicThread | Self::GuildPrivateThread
        )
    }

    /// Check if channels of this type can own threads
    #[inline]
    #[must_use]
    pub fn is_thread_bearing(self) -> bool {
        matches!(self, Self::GuildText | Self::GuildNews | Self::GuildForum)
    }

    /// Check if channels of this type only exist inside a guild
    #[inline]
    #[must_use]
    pub fn is_guild_scoped(self) -> bool {
        !matches!(self, Self::Dm | Self::GroupDm | Self::Unknown(_))
    }

    /// Check if messages can be sent in channels of this type
    #[inline]
    #[must_use]
    pub fn is_text_based(self) -> bool {
        matches!(self, Self::GuildText | Self::GuildNews | Self::Dm | Self::GroupDm) || self.is_thread()
    }

    /// Check if this is a voice type
    #[inline]
    #[must_use]
    pub fn is_voice(self) -> bool {
        matches!(self, Self::GuildVoice | Self::GuildStageVoice)
    }
}

impl From<i16> for ChannelType {
    fn from(value: i16) -> Self {
        match value {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            3 => Self::GroupDm,
            4 => Self::GuildCategory,
            5 => Self::GuildNews,
            6 => Self::GuildStore,
            10 => Self::GuildNewsThread,
            11 => Self::GuildPublicThread,
            12 => Self::GuildPrivateThread,
            13 => Self::GuildStageVoice,
            14 => Self::GuildDirectory,
            15 => Self::GuildForum,
            other => Self::Unknown(other),
        }
    }
}

impl From<ChannelType> for i16 {
    fn from(ct: ChannelType) -> Self {
        ct.as_i16()
    }
}

/// Shape of a channel record, selected by its discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelShape {
    Text,
    Voice,
    Category,
    Thread,
    Dm,
    GroupDm,
}

impl ChannelShape {
    /// Map a discriminator to the record shape it builds, if any
    #[must_use]
    pub fn of(kind: ChannelType) -> Option<Self> {
        match kind {
            ChannelType::GuildText | ChannelType::GuildNews | ChannelType::GuildForum => {
                Some(Self::Text)
            }
            ChannelType::GuildVoice | ChannelType::GuildStageVoice => Some(Self::Voice),
            ChannelType::GuildCategory => Some(Self::Category),
            ChannelType::GuildNewsThread
            | ChannelType::GuildPublicThread
            | ChannelType::GuildPrivateThread => Some(Self::Thread),
            ChannelType::Dm => Some(Self::Dm),
            ChannelType::GroupDm => Some(Self::GroupDm),
            ChannelType::GuildStore | ChannelType::GuildDirectory | ChannelType::Unknown(_) => {
                None
            }
        }
    }
}

/// Guild text, announcement and forum channel fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextData {
    pub position: i32,
    pub topic: Option<String>,
    pub nsfw: bool,
    pub last_message_id: Option<Snowflake>,
    pub rate_limit_per_user: u32,
}

/// Guild voice and stage channel fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceData {
    pub position: i32,
    pub bitrate: u32,
    pub user_limit: u32,
    pub rtc_region: Option<String>,
}

/// Category fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryData {
    pub position: i32,
}

/// Thread fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadData {
    pub owner_id: Option<Snowflake>,
    pub archived: bool,
    pub locked: bool,
    pub auto_archive_duration: Option<u32>,
    pub archive_timestamp: Option<DateTime<Utc>>,
    pub message_count: u32,
    pub member_count: u32,
    pub last_message_id: Option<Snowflake>,
    pub rate_limit_per_user: u32,
}

/// One-to-one DM fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DmData {
    pub recipient_id: Option<Snowflake>,
    pub last_message_id: Option<Snowflake>,
}

/// Group DM fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDmData {
    pub recipients: Vec<Snowflake>,
    pub owner_id: Option<Snowflake>,
    pub icon: Option<String>,
    pub last_message_id: Option<Snowflake>,
}

/// Variant-specific channel data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelData {
    Text(TextData),
    Voice(VoiceData),
    Category(CategoryData),
    Thread(ThreadData),
    Dm(DmData),
    GroupDm(GroupDmData),
}

impl ChannelData {
    /// Build empty data of the given shape and patch it from the payload
    fn from_payload(shape: ChannelShape, payload: &ChannelPayload) -> Self {
        let mut data = match shape {
            ChannelShape::Text => Self::Text(TextData::default()),
            ChannelShape::Voice => Self::Voice(VoiceData::default()),
            ChannelShape::Category => Self::Category(CategoryData::default()),
            ChannelShape::Thread => Self::Thread(ThreadData::default()),
            ChannelShape::Dm => Self::Dm(DmData::default()),
            ChannelShape::GroupDm => Self::GroupDm(GroupDmData::default()),
        };
        data.patch(payload);
        data
    }

    /// Shape of this data
    #[must_use]
    pub fn shape(&self) -> ChannelShape {
        match self {
            Self::Text(_) => ChannelShape::Text,
            Self::Voice(_) => ChannelShape::Voice,
            Self::Category(_) => ChannelShape::Category,
            Self::Thread(_) => ChannelShape::Thread,
            Self::Dm(_) => ChannelShape::Dm,
            Self::GroupDm(_) => ChannelShape::GroupDm,
        }
    }

    fn patch(&mut self, p: &ChannelPayload) {
        match self {
            Self::Text(d) => {
                patch_field(&mut d.position, p.position);
                patch_nullable(&mut d.topic, p.topic.as_ref());
                patch_field(&mut d.nsfw, p.nsfw);
                patch_nullable(&mut d.last_message_id, p.last_message_id.as_ref());
                patch_field(&mut d.rate_limit_per_user, p.rate_limit_per_user);
            }
            Self::Voice(d) => {
                patch_field(&mut d.position, p.position);
                patch_field(&mut d.bitrate, p.bitrate);
                patch_field(&mut d.user_limit, p.user_limit);
                patch_nullable(&mut d.rtc_region, p.rtc_region.as_ref());
            }
            Self::Category(d) => patch_field(&mut d.position, p.position),
            Self::Thread(d) => {
                patch_nullable(&mut d.owner_id, p.owner_id.as_ref());
                if let Some(meta) = &p.thread_metadata {
                    d.archived = meta.archived;
                    d.locked = meta.locked;
                    patch_opt(&mut d.auto_archive_duration, meta.auto_archive_duration.as_ref());
                    patch_opt(&mut d.archive_timestamp, meta.archive_timestamp.as_ref());
                }
                patch_field(&mut d.message_count, p.message_count);
                patch_field(&mut d.member_count, p.member_count);
                patch_nullable(&mut d.last_message_id, p.last_message_id.as_ref());
                patch_field(&mut d.rate_limit_per_user, p.rate_limit_per_user);
            }
            Self::Dm(d) => {
                if let Some(first) = p.recipients.as_ref().and_then(|r| r.first()) {
                    d.recipient_id = Some(first.id);
                }
                patch_nullable(&mut d.last_message_id, p.last_message_id.as_ref());
            }
            Self::GroupDm(d) => {
                if let Some(ids) = p.recipient_ids() {
                    d.recipients = ids;
                }
                patch_nullable(&mut d.owner_id, p.owner_id.as_ref());
                patch_nullable(&mut d.icon, p.icon.as_ref());
                patch_nullable(&mut d.last_message_id, p.last_message_id.as_ref());
            }
        }
    }
}

fn patch_field<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Missing keeps the slot, `null` clears it
fn patch_nullable<T: Clone>(slot: &mut Option<T>, value: Option<&Option<T>>) {
    if let Some(value) = value {
        slot.clone_from(value);
    }
}

fn patch_opt<T: Clone>(slot: &mut Option<T>, value: Option<&T>) {
    if let Some(value) = value {
        *slot = Some(value.clone());
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub kind: ChannelType,
    pub guild_id: Option<Snowflake>,
    /// Category for top-level channels, parent channel for threads
    pub parent_id: Option<Snowflake>,
    pub name: Option<String>,
    /// Built from a bare payload and not yet refreshed
    pub partial: bool,
    pub data: ChannelData,
}

impl Channel {
    /// Build a record from a payload.
    ///
    /// Returns `None` when the discriminator maps to no known shape.
    #[must_use]
    pub fn from_payload(payload: &ChannelPayload) -> Option<Self> {
        let shape = ChannelShape::of(payload.kind)?;
        Some(Self {
            id: payload.id,
            kind: payload.kind,
            guild_id: payload.guild_id,
            parent_id: payload.parent(),
            name: payload.name.clone().flatten(),
            partial: payload.is_bare(),
            data: ChannelData::from_payload(shape, payload),
        })
    }

    /// Apply the fields present in `payload` in place.
    ///
    /// When the discriminator moves to another known shape the variant data
    /// is rebuilt from the payload; an unknown discriminator leaves the
    /// variant untouched.
    pub fn patch(&mut self, payload: &ChannelPayload) {
        if let Some(shape) = ChannelShape::of(payload.kind) {
            if shape == self.data.shape() {
                self.data.patch(payload);
            } else {
                self.data = ChannelData::from_payload(shape, payload);
            }
            self.kind = payload.kind;
        }
        patch_opt(&mut self.guild_id, payload.guild_id.as_ref());
        patch_nullable(&mut self.parent_id, payload.parent_id.as_ref());
        patch_nullable(&mut self.name, payload.name.as_ref());
        if !payload.is_bare() {
            self.partial = false;
        }
    }

    /// Check if this is a thread
    #[inline]
    #[must_use]
    pub fn is_thread(&self) -> bool {
        matches!(self.data, ChannelData::Thread(_))
    }

    /// Check if this channel can own threads
    #[inline]
    #[must_use]
    pub fn is_thread_bearing(&self) -> bool {
        matches!(self.data, ChannelData::Text(_))
    }

    /// Check if this is a category
    #[inline]
    #[must_use]
    pub fn is_category(&self) -> bool {
        matches!(self.data, ChannelData::Category(_))
    }

    /// Check if this is a DM or group DM channel
    #[inline]
    #[must_use]
    pub fn is_dm(&self) -> bool {
        matches!(self.data, ChannelData::Dm(_) | ChannelData::GroupDm(_))
    }

    /// Check if this is a guild channel
    #[inline]
    #[must_use]
    pub fn is_guild_channel(&self) -> bool {
        self.guild_id.is_some()
    }

    /// Get display name (channel name or fallback for DMs)
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(match self.data {
            ChannelData::GroupDm(_) => "Group DM",
            _ => "Direct Message",
        })
    }

    /// Creation time derived from the id
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.id.created_at()
    }
}
