//! Invite entity - an invite code pointing at a guild channel

use chrono::{DateTime, Duration, Utc};

use crate::payloads::InvitePayload;
use crate::value_objects::Snowflake;

/// Invite entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    pub code: String,
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub inviter_id: Option<Snowflake>,
    pub uses: u32,
    pub max_uses: Option<u32>,
    pub max_age: Option<u32>,
    pub temporary: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Invite {
    /// Create a new Invite
    pub fn new(code: impl Into<String>, guild_id: Snowflake, channel_id: Snowflake) -> Self {
        Self {
            code: code.into(),
            guild_id,
            channel_id,
            inviter_id: None,
            uses: 0,
            max_uses: None,
            max_age: None,
            temporary: false,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    /// Build an invite from its payload
    pub fn from_payload(payload: &InvitePayload) -> Self {
        let mut invite = Self::new(payload.code.clone(), payload.guild_id, payload.channel_id)
            .with_max_uses(payload.max_uses)
            .with_temporary(payload.temporary);
        if let Some(created_at) = payload.created_at {
            invite.created_at = created_at;
        }
        invite.inviter_id = payload.inviter.as_ref().map(|u| u.id);
        invite.uses = payload.uses;
        invite.with_expiration(payload.max_age)
    }

    /// Set expiration relative to creation time; 0 never expires
    pub fn with_expiration(mut self, max_age_seconds: u32) -> Self {
        if max_age_seconds > 0 {
            self.max_age = Some(max_age_seconds);
            self.expires_at = Some(self.created_at + Duration::seconds(i64::from(max_age_seconds)));
        }
        self
    }

    /// Limit the number of uses; 0 is unlimited
    pub fn with_max_uses(mut self, max_uses: u32) -> Self {
        if max_uses > 0 {
            self.max_uses = Some(max_uses);
        }
        self
    }

    /// Mark the invite as granting temporary membership
    pub fn with_temporary(mut self, temporary: bool) -> Self {
        self.temporary = temporary;
        self
    }

    /// Check if invite is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| Utc::now() > expires_at)
    }

    /// Check if invite has reached max uses
    pub fn is_exhausted(&self) -> bool {
        self.max_uses.is_some_and(|max_uses| self.uses >= max_uses)
    }

    /// Check if invite is still valid
    pub fn is_valid(&self) -> bool {
        !self.is_expired() && !self.is_exhausted()
    }

    /// Get remaining uses (None if unlimited)
    pub fn remaining_uses(&self) -> Option<u32> {
        self.max_uses.map(|max| max.saturating_sub(self.uses))
    }

    /// Get the full invite URL
    pub fn url(&self) -> String {
        format!("https://discord.gg/{}", self.code)
    }
}
