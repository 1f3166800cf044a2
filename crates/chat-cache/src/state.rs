//! Shared cache state
//!
//! One store per entity kind. Guild channel indices and parent thread indices
//! hold ids only and always resolve through the global channel store, so a
//! channel reachable from several views is a single record.
//!
//! Every mutation below runs under the owner's write guard. A record is
//! linked into its guild index and its parent's thread index exactly while
//! it sits in the global store.

use chat_core::{Channel, ChannelPayload, Guild, Invite, Snowflake};
use indexmap::IndexSet;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::collection::{CacheOptions, Collection};

/// State shared by every manager of one client
pub(crate) type SharedState = Arc<RwLock<CacheState>>;

/// A cached channel plus the ids of its threads
#[derive(Debug, Clone)]
pub(crate) struct ChannelEntry {
    pub channel: Channel,
    /// `Some` exactly when the channel can own threads
    pub threads: Option<IndexSet<Snowflake>>,
}

impl ChannelEntry {
    fn new(channel: Channel) -> Self {
        let threads = channel.is_thread_bearing().then(IndexSet::new);
        Self { channel, threads }
    }
}

/// A cached guild plus its channel and invite indices
#[derive(Debug)]
pub(crate) struct GuildEntry {
    pub guild: Guild,
    pub channels: IndexSet<Snowflake>,
    pub invites: Collection<String, Invite>,
}

/// The index memberships a channel record implies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Links {
    guild_id: Option<Snowflake>,
    parent_id: Option<Snowflake>,
    is_thread: bool,
}

impl Links {
    fn of(channel: &Channel) -> Self {
        Self {
            guild_id: channel.guild_id,
            parent_id: channel.parent_id,
            is_thread: channel.is_thread(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct CacheState {
    pub channels: Collection<Snowflake, ChannelEntry>,
    pub guilds: Collection<Snowflake, GuildEntry>,
    invite_options: CacheOptions<String, Invite>,
}

impl CacheState {
    pub fn new(
        channel_options: CacheOptions<Snowflake, Channel>,
        invite_options: CacheOptions<String, Invite>,
    ) -> Self {
        let CacheOptions {
            max_size,
            keep_over_limit,
        } = channel_options;
        let mut options = CacheOptions::<Snowflake, ChannelEntry> {
            max_size,
            keep_over_limit: None,
        };
        if let Some(keep) = keep_over_limit {
            options = options.with_keep_over_limit(move |id, entry: &ChannelEntry| {
                keep(id, &entry.channel)
            });
        }

        Self {
            channels: Collection::with_options(options),
            guilds: Collection::new(),
            invite_options,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    pub fn channel(&self, id: Snowflake) -> Option<&Channel> {
        self.channels.get(&id).map(|entry| &entry.channel)
    }

    pub fn thread_ids(&self, parent_id: Snowflake) -> Option<&IndexSet<Snowflake>> {
        self.channels.get(&parent_id)?.threads.as_ref()
    }

    // =========================================================================
    // Channels
    // =========================================================================

    /// Store a freshly built record and link it.
    ///
    /// Entries evicted to make room go through the removal cleanup. Returns
    /// false when the store kept nothing (a zero-size cache).
    pub fn insert_channel(&mut self, channel: Channel) -> bool {
        let id = channel.id;
        for (evicted_id, entry) in self.channels.set(id, ChannelEntry::new(channel)) {
            if evicted_id != id {
                tracing::trace!(channel_id = %evicted_id, "Channel evicted from cache");
                self.release_channel(entry);
            }
        }

        if !self.channels.contains_key(&id) {
            return false;
        }
        self.link_channel(id);
        self.adopt_threads(id);
        true
    }

    /// Patch a cached record in place, keeping every index consistent with
    /// the patched guild, parent and shape.
    pub fn patch_channel(&mut self, id: Snowflake, payload: &ChannelPayload) {
        let Some(entry) = self.channels.get_mut(&id) else {
            return;
        };

        let before = Links::of(&entry.channel);
        entry.channel.patch(payload);
        let after = Links::of(&entry.channel);

        let mut became_bearing = false;
        let mut orphaned = None;
        match (entry.channel.is_thread_bearing(), entry.threads.is_some()) {
            (true, false) => {
                entry.threads = Some(IndexSet::new());
                became_bearing = true;
            }
            (false, true) => orphaned = entry.threads.take(),
            _ => {}
        }

        if before != after {
            self.unlink_channel(id, before);
            if before.guild_id != after.guild_id {
                self.drop_invites(id, before.guild_id);
            }
            self.link_channel(id);
        }
        if became_bearing {
            self.adopt_threads(id);
        }
        for thread_id in orphaned.into_iter().flatten() {
            self.remove_channel(thread_id);
        }
    }

    /// Move a guild-less record into `guild_id`.
    ///
    /// A record already bound to another guild keeps it; returns false then.
    pub fn assign_guild(&mut self, id: Snowflake, guild_id: Snowflake) -> bool {
        let Some(entry) = self.channels.get_mut(&id) else {
            return false;
        };
        match entry.channel.guild_id {
            Some(current) => current == guild_id,
            None => {
                entry.channel.guild_id = Some(guild_id);
                self.link_channel(id);
                true
            }
        }
    }

    /// Remove a record from every index and the global store.
    ///
    /// Threads the record owned are removed the same way. Absent ids are a
    /// no-op.
    pub fn remove_channel(&mut self, id: Snowflake) -> Option<Channel> {
        let entry = self.channels.delete(&id)?;
        Some(self.release_channel(entry))
    }

    /// Cleanup for an entry that has left the global store
    fn release_channel(&mut self, entry: ChannelEntry) -> Channel {
        let ChannelEntry { channel, threads } = entry;
        let id = channel.id;

        self.unlink_channel(id, Links::of(&channel));
        self.drop_invites(id, channel.guild_id);

        for thread_id in threads.into_iter().flatten() {
            if self.remove_channel(thread_id).is_none() {
                // Not in the global store; make sure no guild view keeps it.
                if let Some(guild) = channel.guild_id.and_then(|gid| self.guilds.get_mut(&gid)) {
                    guild.channels.shift_remove(&thread_id);
                }
            }
        }

        channel
    }

    /// Ensure a cached record sits in the indices its fields name
    pub fn link_channel(&mut self, id: Snowflake) {
        let Some(links) = self.channels.get(&id).map(|entry| Links::of(&entry.channel)) else {
            return;
        };

        if let Some(guild) = links.guild_id.and_then(|gid| self.guilds.get_mut(&gid)) {
            guild.channels.insert(id);
        }
        if links.is_thread {
            if let Some(threads) = links
                .parent_id
                .and_then(|pid| self.channels.get_mut(&pid))
                .and_then(|parent| parent.threads.as_mut())
            {
                threads.insert(id);
            }
        }
    }

    fn unlink_channel(&mut self, id: Snowflake, links: Links) {
        if let Some(guild) = links.guild_id.and_then(|gid| self.guilds.get_mut(&gid)) {
            guild.channels.shift_remove(&id);
        }
        self.unlink_thread(id, links);
    }

    fn drop_invites(&mut self, channel_id: Snowflake, guild_id: Option<Snowflake>) {
        if let Some(guild) = guild_id.and_then(|gid| self.guilds.get_mut(&gid)) {
            guild.invites.retain(|_, invite| invite.channel_id != channel_id);
        }
    }

    fn unlink_thread(&mut self, id: Snowflake, links: Links) {
        if !links.is_thread {
            return;
        }
        if let Some(threads) = links
            .parent_id
            .and_then(|pid| self.channels.get_mut(&pid))
            .and_then(|parent| parent.threads.as_mut())
        {
            threads.shift_remove(&id);
        }
    }

    /// Index cached threads that name `parent_id` but arrived before it
    fn adopt_threads(&mut self, parent_id: Snowflake) {
        let orphans: Vec<Snowflake> = self
            .channels
            .iter()
            .filter(|(_, entry)| {
                entry.channel.is_thread() && entry.channel.parent_id == Some(parent_id)
            })
            .map(|(id, _)| *id)
            .collect();

        if let Some(threads) = self
            .channels
            .get_mut(&parent_id)
            .and_then(|parent| parent.threads.as_mut())
        {
            threads.extend(orphans);
        }
    }

    // =========================================================================
    // Guilds
    // =========================================================================

    /// Insert or patch a guild; a new guild links every cached channel naming it
    pub fn upsert_guild(&mut self, guild: Guild) -> bool {
        let id = guild.id;
        if let Some(entry) = self.guilds.get_mut(&id) {
            entry.guild = guild;
            return false;
        }

        let channels: IndexSet<Snowflake> = self
            .channels
            .iter()
            .filter(|(_, entry)| entry.channel.guild_id == Some(id))
            .map(|(channel_id, _)| *channel_id)
            .collect();
        let entry = GuildEntry {
            guild,
            channels,
            invites: Collection::with_options(self.invite_options.clone()),
        };
        for (_, evicted) in self.guilds.set(id, entry) {
            self.release_guild(evicted);
        }
        true
    }

    /// Remove a guild and every channel it indexes
    pub fn remove_guild(&mut self, id: Snowflake) -> Option<Guild> {
        let entry = self.guilds.get(&id)?;
        let channel_ids: Vec<Snowflake> = entry.channels.iter().copied().collect();
        for channel_id in channel_ids {
            self.remove_channel(channel_id);
        }
        let entry = self.guilds.delete(&id)?;
        Some(entry.guild)
    }

    fn release_guild(&mut self, entry: GuildEntry) {
        for channel_id in entry.channels {
            self.remove_channel(channel_id);
        }
    }

    /// Index an invite under its guild.
    ///
    /// Rejected unless the target channel is cached in that same guild.
    pub fn insert_invite(&mut self, invite: Invite) -> bool {
        if self.channel(invite.channel_id).and_then(|c| c.guild_id) != Some(invite.guild_id) {
            return false;
        }
        let Some(guild) = self.guilds.get_mut(&invite.guild_id) else {
            return false;
        };
        let code = invite.code.clone();
        let evicted = guild.invites.set(code.clone(), invite);
        evicted.iter().all(|(evicted_code, _)| *evicted_code != code)
    }

    pub fn remove_invite(&mut self, guild_id: Snowflake, code: &str) -> Option<Invite> {
        self.guilds
            .get_mut(&guild_id)?
            .invites
            .delete(&code.to_string())
    }
}

impl Default for CacheState {
    fn default() -> Self {
        Self::new(CacheOptions::unbounded(), CacheOptions::unbounded())
    }
}
