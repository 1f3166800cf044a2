//! Channel manager
//!
//! Owns the global channel cache. Every channel record the client holds is
//! created, patched and removed here.

use chat_core::{
    Channel, ChannelData, ChannelHttp, ChannelPayload, ChannelResolvable, DomainError,
    DomainResult, RelationshipLookup, Snowflake, UserResolvable,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::instrument;

use crate::resolver::resolve_channel;
use crate::state::{CacheState, SharedState};

/// Most recipients a group DM can be created with
pub const MAX_GROUP_DM_RECIPIENTS: usize = 9;

/// Fewest recipients a group DM can be created with
pub const MIN_GROUP_DM_RECIPIENTS: usize = 2;

/// Options for [`ChannelManager::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOptions {
    /// Store new records and patch existing ones
    pub cache: bool,
    /// Build guild-scoped records without a cached guild, and keep them out
    /// of the cache
    pub allow_unknown_guild: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            cache: true,
            allow_unknown_guild: false,
        }
    }
}

/// Options for [`ChannelManager::fetch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub allow_unknown_guild: bool,
    pub cache: bool,
    /// Skip the cache and always hit the network
    pub force: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            allow_unknown_guild: false,
            cache: true,
            force: false,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn force() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }

    fn add_options(self) -> AddOptions {
        AddOptions {
            cache: self.cache,
            allow_unknown_guild: self.allow_unknown_guild,
        }
    }
}

/// Manager for the global channel cache
pub struct ChannelManager {
    state: SharedState,
    http: Arc<dyn ChannelHttp>,
    relationships: Arc<dyn RelationshipLookup>,
    cache_override_warned: bool,
}

impl ChannelManager {
    pub(crate) fn new(
        state: SharedState,
        http: Arc<dyn ChannelHttp>,
        relationships: Arc<dyn RelationshipLookup>,
    ) -> Self {
        let cache_override_warned = !state.read().channels.is_default_caching();
        if cache_override_warned {
            tracing::warn!(
                "Overriding the channel cache is unsupported; evicted channels are removed \
                 from their guilds and parents, and threads of evicted channels go with them"
            );
        }

        Self {
            state,
            http,
            relationships,
            cache_override_warned,
        }
    }

    /// Whether this manager was built with a non-default cache and warned about it
    pub fn cache_override_warned(&self) -> bool {
        self.cache_override_warned
    }

    /// Incorporate a payload into the cache.
    ///
    /// An already cached id is patched in place (when `cache` is set) and the
    /// same record comes back. A new id goes through variant resolution and,
    /// when `cache` is set and `allow_unknown_guild` is not, into the cache
    /// and every index it belongs to. Returns `None` when the payload cannot
    /// become a record.
    pub fn add(
        &self,
        payload: &ChannelPayload,
        guild_id: Option<Snowflake>,
        options: AddOptions,
    ) -> Option<Channel> {
        let mut state = self.state.write();
        add_locked(&mut state, payload, guild_id, options)
    }

    /// Remove a channel from the cache, its guild, its parent and every
    /// invite pointing at it, then remove its threads the same way.
    ///
    /// Unknown ids are a no-op.
    pub fn remove(&self, id: Snowflake) -> Option<Channel> {
        let removed = self.state.write().remove_channel(id);
        if removed.is_some() {
            tracing::trace!(channel_id = %id, "Channel removed from cache");
        }
        removed
    }

    /// Get a channel, from the cache unless forced or only partially known.
    ///
    /// # Errors
    /// Propagates the transport's error (for example `ChannelNotFound`); the
    /// cache is left untouched then.
    #[instrument(skip(self))]
    pub async fn fetch(&self, id: Snowflake, options: FetchOptions) -> DomainResult<Option<Channel>> {
        if !options.force {
            if let Some(channel) = self.get(id).filter(|channel| !channel.partial) {
                return Ok(Some(channel));
            }
        }

        let payload = self.http.get_channel(id).await?;
        Ok(self.add(&payload, None, options.add_options()))
    }

    /// Look up the cached record a resolvable names.
    ///
    /// A record passed in that is not cached comes back as is.
    pub fn resolve<R: ChannelResolvable + ?Sized>(&self, resolvable: &R) -> Option<Channel> {
        if let Some(channel) = resolvable.as_channel() {
            return self.get(channel.id).or_else(|| Some(channel.clone()));
        }
        resolvable.channel_id().and_then(|id| self.get(id))
    }

    /// The id a resolvable names
    pub fn resolve_id<R: ChannelResolvable + ?Sized>(&self, resolvable: &R) -> Option<Snowflake> {
        resolvable.channel_id()
    }

    /// Create a group DM with friends of the current user.
    ///
    /// Recipients that do not resolve or are not friends are dropped first.
    /// The resulting channel is built but not cached; the gateway's
    /// CHANNEL_CREATE for it does that.
    ///
    /// # Errors
    /// `InvalidArgument` unless 2 to 9 recipients remain; otherwise whatever
    /// the transport reports.
    #[instrument(skip(self, recipients))]
    pub async fn create_group_dm<I>(&self, recipients: I) -> DomainResult<Channel>
    where
        I: IntoIterator,
        I::Item: UserResolvable,
    {
        let mut ids: Vec<Snowflake> = Vec::new();
        for id in recipients.into_iter().filter_map(|r| r.user_id()) {
            if self.relationships.is_friend(id) && !ids.contains(&id) {
                ids.push(id);
            }
        }

        if !(MIN_GROUP_DM_RECIPIENTS..=MAX_GROUP_DM_RECIPIENTS).contains(&ids.len()) {
            return Err(DomainError::invalid_argument(format!(
                "Invalid Users length (max={MAX_GROUP_DM_RECIPIENTS})"
            )));
        }

        let payload = self.http.create_group_dm(&ids).await?;
        let options = AddOptions {
            cache: true,
            allow_unknown_guild: true,
        };
        self.add(&payload, None, options).ok_or_else(|| {
            DomainError::Internal(format!(
                "group DM {} came back with unusable type {}",
                payload.id,
                payload.kind.as_i16()
            ))
        })
    }

    /// Remove every cached channel matching `filter`; returns how many went.
    ///
    /// Threads removed along with a matching parent are counted too.
    pub fn sweep<F>(&self, mut filter: F) -> usize
    where
        F: FnMut(&Channel) -> bool,
    {
        let mut state = self.state.write();
        let before = state.channels.len();
        let ids: Vec<Snowflake> = state
            .channels
            .iter()
            .filter(|(_, entry)| filter(&entry.channel))
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            state.remove_channel(id);
        }
        let swept = before - state.channels.len();
        if swept > 0 {
            tracing::debug!(swept, "Swept channels from cache");
        }
        swept
    }

    /// Replace the active threads of some parents with `threads`.
    ///
    /// Unarchived threads cached under the synced parents that are missing
    /// from `threads` are removed; `None` syncs every parent in the guild.
    /// Returns how many stale threads went.
    pub fn sync_threads(
        &self,
        guild_id: Snowflake,
        parent_ids: Option<&[Snowflake]>,
        threads: &[ChannelPayload],
    ) -> usize {
        let mut state = self.state.write();

        let parents: Vec<Snowflake> = match parent_ids {
            Some(ids) => ids.to_vec(),
            None => state
                .guilds
                .get(&guild_id)
                .map(|entry| entry.channels.iter().copied().collect())
                .unwrap_or_default(),
        };
        let incoming: HashSet<Snowflake> = threads.iter().map(|t| t.id).collect();
        let stale: Vec<Snowflake> = parents
            .iter()
            .filter_map(|parent_id| state.thread_ids(*parent_id))
            .flatten()
            .copied()
            .filter(|id| !incoming.contains(id))
            .filter(|id| {
                state
                    .channel(*id)
                    .is_some_and(|c| !matches!(&c.data, ChannelData::Thread(t) if t.archived))
            })
            .collect();

        for id in &stale {
            state.remove_channel(*id);
        }
        for thread in threads {
            add_locked(&mut state, thread, Some(guild_id), AddOptions::default());
        }

        tracing::debug!(
            guild_id = %guild_id,
            removed = stale.len(),
            synced = threads.len(),
            "Thread list synced"
        );
        stale.len()
    }

    /// Snapshot of a cached channel
    pub fn get(&self, id: Snowflake) -> Option<Channel> {
        self.state.read().channel(id).cloned()
    }

    pub fn contains(&self, id: Snowflake) -> bool {
        self.state.read().channels.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.state.read().channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().channels.is_empty()
    }

    /// Cached channel ids in insertion order
    pub fn ids(&self) -> Vec<Snowflake> {
        self.state.read().channels.keys().copied().collect()
    }

    /// Snapshot of every cached channel in insertion order
    pub fn cache(&self) -> Vec<Channel> {
        self.state
            .read()
            .channels
            .values()
            .map(|entry| entry.channel.clone())
            .collect()
    }

    /// Thread ids indexed under a parent; `None` unless the parent is cached
    /// and can own threads
    pub fn thread_ids(&self, parent_id: Snowflake) -> Option<Vec<Snowflake>> {
        self.state
            .read()
            .thread_ids(parent_id)
            .map(|threads| threads.iter().copied().collect())
    }

    /// Snapshots of the threads indexed under a parent
    pub fn threads(&self, parent_id: Snowflake) -> Vec<Channel> {
        let state = self.state.read();
        state
            .thread_ids(parent_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.channel(*id).cloned())
            .collect()
    }
}

/// [`ChannelManager::add`] for callers already holding the write guard
pub(crate) fn add_locked(
    state: &mut CacheState,
    payload: &ChannelPayload,
    guild_id: Option<Snowflake>,
    options: AddOptions,
) -> Option<Channel> {
    let id = payload.id;

    if state.channels.contains_key(&id) {
        if options.cache {
            state.patch_channel(id, payload);
        }
        if let Some(guild_id) = guild_id {
            if !state.assign_guild(id, guild_id) {
                tracing::debug!(
                    channel_id = %id,
                    guild_id = %guild_id,
                    "Ignoring guild for channel already bound to another guild"
                );
            }
        }
        state.link_channel(id);
        return state.channel(id).cloned();
    }

    let guild_context = guild_id
        .or(payload.guild_id)
        .filter(|gid| state.guilds.contains_key(gid));

    let channel = match resolve_channel(payload, guild_context, options.allow_unknown_guild) {
        Ok(channel) => channel,
        Err(e) => {
            tracing::debug!(channel_id = %id, error = %e, "Failed to resolve channel");
            return None;
        }
    };

    if options.cache && !options.allow_unknown_guild && state.insert_channel(channel.clone()) {
        tracing::trace!(channel_id = %id, "Channel cached");
    }

    Some(channel)
}
