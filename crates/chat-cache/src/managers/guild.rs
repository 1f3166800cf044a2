//! Guild manager
//!
//! Holds the guild cache and each guild's channel and invite views. Channel
//! views resolve through the global channel cache.

use chat_core::{Channel, Guild, GuildPayload, Invite, InvitePayload, Snowflake};

use super::channel::{add_locked, AddOptions};
use crate::state::SharedState;

/// Manager for cached guilds
pub struct GuildManager {
    state: SharedState,
}

impl GuildManager {
    pub(crate) fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Cache or patch a guild, then add its embedded channels and threads.
    ///
    /// Channels come before threads so every thread finds its parent.
    pub fn add(&self, payload: &GuildPayload) -> Guild {
        let mut state = self.state.write();

        let guild = match state.guilds.get(&payload.id) {
            Some(entry) => {
                let mut guild = entry.guild.clone();
                guild.patch(payload);
                guild
            }
            None => Guild::from_payload(payload),
        };
        let created = state.upsert_guild(guild.clone());

        let mut added = 0_usize;
        for channel in payload.channels.iter().chain(&payload.threads) {
            if add_locked(&mut state, channel, Some(payload.id), AddOptions::default()).is_some() {
                added += 1;
            }
        }

        tracing::info!(
            guild_id = %payload.id,
            created,
            channels = added,
            "Guild cached"
        );
        guild
    }

    pub fn get(&self, id: Snowflake) -> Option<Guild> {
        self.state
            .read()
            .guilds
            .get(&id)
            .map(|entry| entry.guild.clone())
    }

    pub fn contains(&self, id: Snowflake) -> bool {
        self.state.read().guilds.contains_key(&id)
    }

    /// Cached guild ids in insertion order
    pub fn ids(&self) -> Vec<Snowflake> {
        self.state.read().guilds.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().guilds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().guilds.is_empty()
    }

    /// Mark a guild unavailable without dropping anything it holds
    pub fn mark_unavailable(&self, id: Snowflake) -> bool {
        let mut state = self.state.write();
        let Some(entry) = state.guilds.get_mut(&id) else {
            return false;
        };
        entry.guild.available = false;
        tracing::debug!(guild_id = %id, "Guild unavailable");
        true
    }

    /// Remove a guild; each of its channels goes through channel removal
    pub fn remove(&self, id: Snowflake) -> Option<Guild> {
        let removed = self.state.write().remove_guild(id);
        if removed.is_some() {
            tracing::info!(guild_id = %id, "Guild removed from cache");
        }
        removed
    }

    /// Channel ids indexed under a guild, in insertion order
    pub fn channel_ids(&self, id: Snowflake) -> Option<Vec<Snowflake>> {
        self.state
            .read()
            .guilds
            .get(&id)
            .map(|entry| entry.channels.iter().copied().collect())
    }

    /// Snapshots of the channels indexed under a guild
    pub fn channels(&self, id: Snowflake) -> Vec<Channel> {
        let state = self.state.read();
        let Some(entry) = state.guilds.get(&id) else {
            return Vec::new();
        };
        entry
            .channels
            .iter()
            .filter_map(|channel_id| state.channel(*channel_id).cloned())
            .collect()
    }

    /// Index an invite under its guild.
    ///
    /// Returns `None` when the guild or the target channel is not cached.
    pub fn add_invite(&self, payload: &InvitePayload) -> Option<Invite> {
        let invite = Invite::from_payload(payload);
        if self.state.write().insert_invite(invite.clone()) {
            Some(invite)
        } else {
            tracing::debug!(
                code = %payload.code,
                channel_id = %payload.channel_id,
                "Invite not cached, guild or channel unknown"
            );
            None
        }
    }

    pub fn remove_invite(&self, guild_id: Snowflake, code: &str) -> Option<Invite> {
        self.state.write().remove_invite(guild_id, code)
    }

    /// Snapshots of a guild's invites
    pub fn invites(&self, guild_id: Snowflake) -> Vec<Invite> {
        self.state
            .read()
            .guilds
            .get(&guild_id)
            .map(|entry| entry.invites.values().cloned().collect())
            .unwrap_or_default()
    }
}
