//! Test helpers for integration tests
//!
//! Provides a scripted network port, cache construction and a checker for
//! the cross-index invariants the cache must keep.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use async_trait::async_trait;
use chat_cache::ClientCache;
use chat_common::{try_init_tracing_with_config, CacheConfig, TracingConfig};
use chat_core::{
    ChannelHttp, ChannelPayload, ChannelType, DomainError, DomainResult, RelationshipType,
    Snowflake, User,
};
use parking_lot::Mutex;

use crate::fixtures::unique_id;

/// Network port answering from a scripted set of channels
#[derive(Default)]
pub struct ScriptedHttp {
    channels: Mutex<HashMap<Snowflake, ChannelPayload>>,
    unreachable: Mutex<HashSet<Snowflake>>,
    get_calls: AtomicUsize,
    group_dm_requests: Mutex<Vec<Vec<Snowflake>>>,
    latency: Option<Duration>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every GET by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Serve `payload` for GETs of its id
    pub fn serve(&self, payload: ChannelPayload) {
        self.channels.lock().insert(payload.id, payload);
    }

    /// Answer GETs of `id` with not found from now on
    pub fn forget(&self, id: Snowflake) {
        self.channels.lock().remove(&id);
    }

    /// Answer GETs of `id` with a transport error from now on
    pub fn fail_transport(&self, id: Snowflake) {
        self.unreachable.lock().insert(id);
    }

    /// Number of GETs issued so far
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Recipient lists of every group DM creation issued so far
    pub fn group_dm_requests(&self) -> Vec<Vec<Snowflake>> {
        self.group_dm_requests.lock().clone()
    }
}

#[async_trait]
impl ChannelHttp for ScriptedHttp {
    async fn get_channel(&self, id: Snowflake) -> DomainResult<ChannelPayload> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unreachable.lock().contains(&id) {
            return Err(DomainError::transport(format!("connection reset fetching {id}")));
        }
        self.channels
            .lock()
            .get(&id)
            .cloned()
            .ok_or(DomainError::ChannelNotFound(id))
    }

    async fn create_group_dm(&self, recipients: &[Snowflake]) -> DomainResult<ChannelPayload> {
        self.group_dm_requests.lock().push(recipients.to_vec());
        Ok(ChannelPayload {
            recipients: Some(
                recipients
                    .iter()
                    .map(|id| User::new(*id, format!("user{id}"), "0"))
                    .collect(),
            ),
            ..ChannelPayload::bare(unique_id(), ChannelType::GroupDm)
        })
    }
}

/// Install a test subscriber once per process; later calls are no-ops
pub fn init_test_tracing() {
    let _ = try_init_tracing_with_config(TracingConfig::development());
}

/// Cache with default (unbounded) policies over `http`
pub fn new_cache(http: &Arc<ScriptedHttp>) -> ClientCache {
    new_cache_with(&CacheConfig::default(), http)
}

/// Cache with the given limits over `http`
pub fn new_cache_with(config: &CacheConfig, http: &Arc<ScriptedHttp>) -> ClientCache {
    init_test_tracing();
    ClientCache::new(config, http.clone())
}

/// Mark every id as a friend of the current user
pub fn befriend(cache: &ClientCache, ids: &[Snowflake]) {
    for id in ids {
        cache.relationships().set(*id, RelationshipType::Friend);
    }
}

/// Check the cross-index invariants of a cache
///
/// - every guild channel index entry is cached and names that guild
/// - every thread index entry is a cached thread naming that parent
/// - every cached channel sits in the indices its guild and parent name
/// - no id appears twice in any index
/// - every invite targets a cached channel
pub fn assert_invariants(cache: &ClientCache) -> Result<()> {
    let channels = cache.channels();
    let guilds = cache.guilds();

    let ids = channels.ids();
    let unique: HashSet<Snowflake> = ids.iter().copied().collect();
    ensure!(unique.len() == ids.len(), "duplicate ids in global cache");

    for guild_id in guilds.ids() {
        let indexed = guilds
            .channel_ids(guild_id)
            .context("cached guild without a channel index")?;
        let unique: HashSet<Snowflake> = indexed.iter().copied().collect();
        ensure!(unique.len() == indexed.len(), "duplicate ids in guild {guild_id}");

        for id in &indexed {
            let channel = channels
                .get(*id)
                .with_context(|| format!("guild {guild_id} indexes uncached channel {id}"))?;
            ensure!(
                channel.guild_id == Some(guild_id),
                "guild {guild_id} indexes channel {id} of guild {:?}",
                channel.guild_id
            );
        }

        for invite in guilds.invites(guild_id) {
            ensure!(
                channels.contains(invite.channel_id),
                "invite {} targets uncached channel {}",
                invite.code,
                invite.channel_id
            );
        }
    }

    for channel in channels.cache() {
        if let Some(guild_id) = channel.guild_id.filter(|gid| guilds.contains(*gid)) {
            let indexed = guilds.channel_ids(guild_id).unwrap_or_default();
            ensure!(
                indexed.contains(&channel.id),
                "channel {} missing from guild {guild_id}",
                channel.id
            );
        }

        if let Some(threads) = channels.thread_ids(channel.id) {
            let unique: HashSet<Snowflake> = threads.iter().copied().collect();
            ensure!(unique.len() == threads.len(), "duplicate threads under {}", channel.id);
            for thread_id in threads {
                let thread = channels
                    .get(thread_id)
                    .with_context(|| format!("parent {} indexes uncached thread {thread_id}", channel.id))?;
                ensure!(thread.is_thread(), "{thread_id} indexed as thread but is not one");
                ensure!(
                    thread.parent_id == Some(channel.id),
                    "thread {thread_id} indexed under {} but names {:?}",
                    channel.id,
                    thread.parent_id
                );
            }
        }

        if channel.is_thread() {
            if let Some(parent_threads) = channel.parent_id.and_then(|pid| channels.thread_ids(pid)) {
                ensure!(
                    parent_threads.contains(&channel.id),
                    "thread {} missing from its parent's index",
                    channel.id
                );
            }
        }
    }

    Ok(())
}
