//! Guild entity - a community that owns channels and invites

use crate::payloads::GuildPayload;
use crate::value_objects::Snowflake;

/// Guild (server) entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub owner_id: Option<Snowflake>,
    /// False while the platform reports an outage for this guild
    pub available: bool,
}

impl Guild {
    /// Create a new Guild
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon: None,
            description: None,
            owner_id: None,
            available: true,
        }
    }

    /// Build a guild from its payload
    pub fn from_payload(payload: &GuildPayload) -> Self {
        let mut guild = Self::new(payload.id, String::new());
        guild.patch(payload);
        guild
    }

    /// Apply the fields present in `payload` in place
    pub fn patch(&mut self, payload: &GuildPayload) {
        if let Some(name) = &payload.name {
            self.name.clone_from(name);
        }
        if payload.icon.is_some() {
            self.icon.clone_from(&payload.icon);
        }
        if payload.description.is_some() {
            self.description.clone_from(&payload.description);
        }
        if payload.owner_id.is_some() {
            self.owner_id = payload.owner_id;
        }
        self.available = !payload.unavailable;
    }

    /// Check if a user is the guild owner
    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == Some(user_id)
    }

    /// Get the guild icon URL if set
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_ref()
            .map(|hash| format!("/icons/{}/{}.png", self.id, hash))
    }
}
