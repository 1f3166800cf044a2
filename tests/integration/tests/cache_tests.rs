//! Client cache integration tests
//!
//! Exercise the channel cache through its public surface with a scripted
//! network port; no external services are needed.
//!
//! Run with: cargo test -p integration-tests --test cache_tests

use std::sync::Arc;
use std::time::Duration;

use chat_cache::{AddOptions, CacheOptions, ClientCache, FetchOptions};
use chat_common::CacheConfig;
use chat_core::{Channel, ChannelData, ChannelPayload, ChannelType, Snowflake};
use integration_tests::{
    assert_invariants, befriend, fixtures::*, init_test_tracing, new_cache, new_cache_with,
    ScriptedHttp,
};
use serde_json::json;

fn setup() -> (Arc<ScriptedHttp>, ClientCache) {
    let http = Arc::new(ScriptedHttp::new());
    let cache = new_cache(&http);
    (http, cache)
}

/// Guild with one text channel holding two threads
struct ThreadedGuild {
    guild: Snowflake,
    parent: Snowflake,
    threads: [Snowflake; 2],
}

fn threaded_guild(cache: &ClientCache) -> ThreadedGuild {
    let guild_id = unique_id();
    let parent = unique_id();
    let threads = [unique_id(), unique_id()];

    let mut payload = guild(guild_id);
    payload.channels = vec![text_channel(parent, guild_id)];
    payload.threads = threads
        .iter()
        .map(|id| thread(*id, guild_id, parent))
        .collect();
    cache.guilds().add(&payload);

    ThreadedGuild {
        guild: guild_id,
        parent,
        threads,
    }
}

/// Everything observable about the channel side of a cache
fn snapshot(cache: &ClientCache) -> Vec<String> {
    let mut lines: Vec<String> = cache
        .channels()
        .cache()
        .iter()
        .map(|c| format!("{} {:?} {:?}", c.id, c.guild_id, cache.channels().thread_ids(c.id)))
        .collect();
    for guild_id in cache.guilds().ids() {
        lines.push(format!("{guild_id} {:?}", cache.guilds().channel_ids(guild_id)));
    }
    lines
}

// ============================================================================
// Invariants
// ============================================================================

/// Small deterministic xorshift so the sequence is reproducible
struct Sequence(u64);

impl Sequence {
    fn next(&mut self, bound: usize) -> usize {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % bound as u64) as usize
    }
}

#[test]
fn test_invariants_hold_across_mixed_operations() {
    let (_, cache) = setup();
    let guilds = [unique_id(), unique_id()];
    let ids: Vec<Snowflake> = (0..12).map(|_| unique_id()).collect();
    let mut seq = Sequence(0x2545_F491_4F6C_DD1D);

    for step in 0..600 {
        let guild_id = guilds[seq.next(guilds.len())];
        let id = ids[seq.next(ids.len())];
        let other = ids[seq.next(ids.len())];

        match seq.next(9) {
            0 => {
                cache.guilds().add(&guild(guild_id));
            }
            1 => {
                cache.channels().add(&text_channel(id, guild_id), None, AddOptions::default());
            }
            2 if id != other => {
                cache.channels().add(&thread(id, guild_id, other), None, AddOptions::default());
            }
            3 => {
                cache.channels().add(&voice_channel(id, guild_id), None, AddOptions::default());
            }
            4 => {
                cache.channels().remove(id);
            }
            5 if seq.next(4) == 0 => {
                cache.guilds().remove(guild_id);
            }
            6 => {
                cache.guilds().add_invite(&invite(&format!("c{step}"), guild_id, id));
            }
            7 => {
                cache.channels().add(&category(id, guild_id), None, AddOptions::default());
            }
            8 => {
                cache.channels().add(&unknown_channel(id), None, AddOptions::default());
            }
            _ => {}
        }

        if let Err(e) = assert_invariants(&cache) {
            panic!("invariants broken at step {step}: {e:#}");
        }
    }
}

#[test]
fn test_remove_is_idempotent() {
    let (_, cache) = setup();
    let layout = threaded_guild(&cache);
    let other = unique_id();
    cache
        .channels()
        .add(&voice_channel(other, layout.guild), None, AddOptions::default());

    assert!(cache.channels().remove(layout.parent).is_some());
    let once = snapshot(&cache);

    assert!(cache.channels().remove(layout.parent).is_none());
    assert_eq!(snapshot(&cache), once);
    assert_invariants(&cache).unwrap();
}

#[test]
fn test_remove_cascades_to_threads() {
    let (_, cache) = setup();
    let layout = threaded_guild(&cache);
    assert_eq!(
        cache.guilds().channel_ids(layout.guild).unwrap().len(),
        3,
        "parent and both threads indexed"
    );

    cache.channels().remove(layout.parent);

    let indexed = cache.guilds().channel_ids(layout.guild).unwrap();
    assert!(!indexed.contains(&layout.parent));
    for thread_id in layout.threads {
        assert!(!indexed.contains(&thread_id));
        assert!(!cache.channels().contains(thread_id));
    }
    assert_invariants(&cache).unwrap();
}

#[test]
fn test_removing_channel_drops_its_invites() {
    let (_, cache) = setup();
    let layout = threaded_guild(&cache);
    let voice = unique_id();
    cache
        .channels()
        .add(&voice_channel(voice, layout.guild), None, AddOptions::default());
    cache.guilds().add_invite(&invite("parent", layout.guild, layout.parent)).unwrap();
    cache.guilds().add_invite(&invite("voice", layout.guild, voice)).unwrap();

    cache.channels().remove(layout.parent);

    let codes: Vec<String> = cache
        .guilds()
        .invites(layout.guild)
        .into_iter()
        .map(|i| i.code)
        .collect();
    assert_eq!(codes, vec!["voice".to_string()]);
}

// ============================================================================
// Add
// ============================================================================

#[test]
fn test_unknown_discriminator_leaves_cache_size() {
    let (_, cache) = setup();
    threaded_guild(&cache);
    let before = cache.channels().len();

    let result = cache
        .channels()
        .add(&unknown_channel(unique_id()), None, AddOptions::default());

    assert!(result.is_none());
    assert_eq!(cache.channels().len(), before);
}

#[test]
fn test_add_returns_same_record_for_known_id() {
    let (_, cache) = setup();
    let layout = threaded_guild(&cache);

    let first = cache.channels().get(layout.parent).unwrap();
    let again = cache
        .channels()
        .add(&text_channel(layout.parent, layout.guild), None, AddOptions::default())
        .unwrap();

    assert_eq!(first.id, again.id);
    assert_eq!(cache.channels().len(), 3);
    assert_eq!(cache.channels().thread_ids(layout.parent).unwrap().len(), 2);
}

#[test]
fn test_conflicting_guild_is_ignored() {
    let (_, cache) = setup();
    let layout = threaded_guild(&cache);
    let other_guild = unique_id();
    cache.guilds().add(&guild(other_guild));

    let channel = cache
        .channels()
        .add(
            &ChannelPayload::bare(layout.parent, ChannelType::GuildText),
            Some(other_guild),
            AddOptions::default(),
        )
        .unwrap();

    assert_eq!(channel.guild_id, Some(layout.guild));
    assert_eq!(cache.guilds().channel_ids(other_guild), Some(Vec::new()));
    assert_invariants(&cache).unwrap();
}

#[test]
fn test_uncached_add_links_nowhere() {
    let (_, cache) = setup();
    let guild_id = unique_id();
    cache.guilds().add(&guild(guild_id));
    let id = unique_id();

    let channel = cache.channels().add(
        &text_channel(id, guild_id),
        None,
        AddOptions {
            cache: false,
            allow_unknown_guild: false,
        },
    );

    assert!(channel.is_some());
    assert!(!cache.channels().contains(id));
    assert_eq!(cache.guilds().channel_ids(guild_id), Some(Vec::new()));
}

#[test]
fn test_thread_before_parent_is_adopted() {
    let (_, cache) = setup();
    let guild_id = unique_id();
    cache.guilds().add(&guild(guild_id));
    let parent = unique_id();
    let child = unique_id();

    cache
        .channels()
        .add(&thread(child, guild_id, parent), None, AddOptions::default());
    cache
        .channels()
        .add(&text_channel(parent, guild_id), None, AddOptions::default());

    assert_eq!(cache.channels().thread_ids(parent), Some(vec![child]));
    assert_invariants(&cache).unwrap();
}

// ============================================================================
// Fetch
// ============================================================================

#[tokio::test]
async fn test_fetch_prefers_cache_unless_forced() {
    let (http, cache) = setup();
    let layout = threaded_guild(&cache);
    http.serve(text_channel(layout.parent, layout.guild));

    let channel = cache
        .channels()
        .fetch(layout.parent, FetchOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(channel.id, layout.parent);
    assert_eq!(http.get_calls(), 0);

    cache
        .channels()
        .fetch(layout.parent, FetchOptions::force())
        .await
        .unwrap();
    assert_eq!(http.get_calls(), 1);
}

#[tokio::test]
async fn test_fetch_miss_caches_result() {
    let (http, cache) = setup();
    let guild_id = unique_id();
    cache.guilds().add(&guild(guild_id));
    let id = unique_id();
    http.serve(text_channel(id, guild_id));

    cache.channels().fetch(id, FetchOptions::default()).await.unwrap();
    cache.channels().fetch(id, FetchOptions::default()).await.unwrap();

    assert_eq!(http.get_calls(), 1);
    assert_eq!(cache.guilds().channel_ids(guild_id), Some(vec![id]));
}

#[tokio::test]
async fn test_fetch_not_found_propagates() {
    let (http, cache) = setup();
    let layout = threaded_guild(&cache);
    http.forget(layout.parent);

    let err = cache
        .channels()
        .fetch(layout.parent, FetchOptions::force())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(cache.channels().contains(layout.parent));
}

#[tokio::test]
async fn test_fetch_transport_error_leaves_partial_record() {
    let (http, cache) = setup();
    let guild_id = unique_id();
    cache.guilds().add(&guild(guild_id));
    let id = unique_id();
    cache.channels().add(
        &ChannelPayload::bare(id, ChannelType::GuildText).with_guild(guild_id),
        None,
        AddOptions::default(),
    );
    let before = cache.channels().get(id).unwrap();
    assert!(before.partial);
    http.serve(text_channel(id, guild_id));
    http.fail_transport(id);

    let err = cache
        .channels()
        .fetch(id, FetchOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert_eq!(http.get_calls(), 1);
    assert_eq!(cache.channels().get(id), Some(before));
    assert_eq!(cache.guilds().channel_ids(guild_id), Some(vec![id]));
    assert_invariants(&cache).unwrap();
}

#[tokio::test]
async fn test_fetch_unknown_guild_is_not_cached() {
    let (http, cache) = setup();
    let id = unique_id();
    http.serve(text_channel(id, unique_id()));

    let options = FetchOptions {
        allow_unknown_guild: true,
        ..FetchOptions::default()
    };
    let channel = cache.channels().fetch(id, options).await.unwrap();

    assert!(channel.is_some());
    assert!(!cache.channels().contains(id));
}

#[tokio::test]
async fn test_concurrent_fetches_keep_one_record() {
    init_test_tracing();
    let http = Arc::new(ScriptedHttp::new().with_latency(Duration::from_millis(5)));
    let cache = new_cache(&http);
    let guild_id = unique_id();
    cache.guilds().add(&guild(guild_id));
    let id = unique_id();
    http.serve(text_channel(id, guild_id));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.channels().fetch(id, FetchOptions::force()).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(http.get_calls(), 16);
    assert_eq!(cache.channels().len(), 1);
    assert_eq!(cache.guilds().channel_ids(guild_id), Some(vec![id]));
    assert_invariants(&cache).unwrap();
}

// ============================================================================
// Group DMs
// ============================================================================

#[tokio::test]
async fn test_group_dm_recipient_count() {
    let (http, cache) = setup();
    let friends: Vec<Snowflake> = (0..10).map(|_| unique_id()).collect();
    befriend(&cache, &friends);

    let empty: [Snowflake; 0] = [];
    for recipients in [&empty[..], &friends[..1], &friends[..]] {
        let err = cache
            .channels()
            .create_group_dm(recipients.iter().copied())
            .await
            .unwrap_err();
        assert!(err.is_invalid_argument(), "{} recipients", recipients.len());
    }
    assert!(http.group_dm_requests().is_empty());

    for count in 2..=9 {
        let channel = cache
            .channels()
            .create_group_dm(friends[..count].iter().copied())
            .await
            .unwrap();
        assert!(matches!(&channel.data, ChannelData::GroupDm(d) if d.recipients.len() == count));
        assert!(cache.channels().resolve(&channel.id).is_none());
    }
    assert_eq!(http.group_dm_requests().len(), 8);
}

#[tokio::test]
async fn test_group_dm_drops_strangers() {
    let (http, cache) = setup();
    let friends = [unique_id(), unique_id()];
    befriend(&cache, &friends);
    let stranger = unique_id();

    let recipients = vec![
        friends[0].to_string(),
        stranger.to_string(),
        "not-a-snowflake".to_string(),
        friends[1].to_string(),
    ];
    cache.channels().create_group_dm(recipients).await.unwrap();
    assert_eq!(http.group_dm_requests(), vec![friends.to_vec()]);

    let err = cache
        .channels()
        .create_group_dm([friends[0], stranger])
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn test_group_dm_repeated_recipient_counts_once() {
    let (http, cache) = setup();
    let friend = unique_id();
    befriend(&cache, &[friend]);

    let err = cache
        .channels()
        .create_group_dm([friend, friend])
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(http.group_dm_requests().is_empty());
}

#[tokio::test]
async fn test_group_dm_cached_by_channel_create() {
    let (_, cache) = setup();
    let friends = [unique_id(), unique_id()];
    befriend(&cache, &friends);

    let channel = cache.channels().create_group_dm(friends).await.unwrap();
    assert!(cache.channels().resolve(&channel.id).is_none());

    cache
        .handle_dispatch(
            "CHANNEL_CREATE",
            json!({
                "id": channel.id, "type": 3,
                "recipients": [{ "id": friends[0], "username": "a" }, { "id": friends[1], "username": "b" }]
            }),
        )
        .unwrap();
    let cached = cache.channels().resolve(&channel.id).unwrap();
    assert!(matches!(&cached.data, ChannelData::GroupDm(d) if d.recipients == friends));
}

// ============================================================================
// Limits
// ============================================================================

#[test]
fn test_limited_cache_evicts_through_removal() {
    let http = Arc::new(ScriptedHttp::new());
    let config = CacheConfig {
        channels_max_size: Some(3),
        invites_max_size: None,
    };
    let cache = new_cache_with(&config, &http);
    assert!(cache.channels().cache_override_warned());

    let layout = threaded_guild(&cache);
    let newcomer = unique_id();
    cache
        .channels()
        .add(&voice_channel(newcomer, layout.guild), None, AddOptions::default());

    // The parent was oldest; its threads go with it.
    assert!(!cache.channels().contains(layout.parent));
    assert!(cache.channels().len() <= 3);
    assert_eq!(cache.guilds().channel_ids(layout.guild), Some(vec![newcomer]));
    assert_invariants(&cache).unwrap();
}

#[test]
fn test_keep_over_limit_protects_parents() {
    init_test_tracing();
    let http = Arc::new(ScriptedHttp::new());
    let cache = ClientCache::builder()
        .http(http)
        .channel_options(CacheOptions::limited(1).with_keep_over_limit(
            |_: &Snowflake, channel: &Channel| channel.is_thread_bearing(),
        ))
        .build()
        .unwrap();

    let layout = threaded_guild(&cache);

    assert!(cache.channels().contains(layout.parent));
    assert_invariants(&cache).unwrap();
}

// ============================================================================
// Gateway events
// ============================================================================

#[test]
fn test_thread_list_sync_replaces_active_threads() {
    let (_, cache) = setup();
    let layout = threaded_guild(&cache);
    let archived = unique_id();
    cache.channels().add(
        &archived_thread(archived, layout.guild, layout.parent),
        None,
        AddOptions::default(),
    );
    let fresh = unique_id();

    cache
        .handle_dispatch(
            "THREAD_LIST_SYNC",
            json!({
                "guild_id": layout.guild,
                "channel_ids": [layout.parent],
                "threads": [serde_json::to_value(thread(fresh, layout.guild, layout.parent)).unwrap()]
            }),
        )
        .unwrap();

    let threads = cache.channels().thread_ids(layout.parent).unwrap();
    assert_eq!(threads, vec![archived, fresh]);
    for stale in layout.threads {
        assert!(!cache.channels().contains(stale));
    }
    assert_invariants(&cache).unwrap();
}

#[test]
fn test_channel_update_moves_between_parents() {
    let (_, cache) = setup();
    let layout = threaded_guild(&cache);
    let other_parent = unique_id();
    cache.channels().add(
        &text_channel(other_parent, layout.guild),
        None,
        AddOptions::default(),
    );

    cache
        .handle_dispatch(
            "THREAD_UPDATE",
            json!({ "id": layout.threads[0], "type": 11, "parent_id": other_parent }),
        )
        .unwrap();

    assert_eq!(cache.channels().thread_ids(layout.parent), Some(vec![layout.threads[1]]));
    assert_eq!(cache.channels().thread_ids(other_parent), Some(vec![layout.threads[0]]));
    assert_invariants(&cache).unwrap();
}

#[test]
fn test_channel_leaves_its_category() {
    let (_, cache) = setup();
    let layout = threaded_guild(&cache);
    let category_id = unique_id();
    cache
        .channels()
        .add(&category(category_id, layout.guild), None, AddOptions::default());
    cache.channels().add(
        &text_channel(layout.parent, layout.guild).with_parent(category_id),
        None,
        AddOptions::default(),
    );
    assert_eq!(cache.channels().get(layout.parent).unwrap().parent_id, Some(category_id));

    let moved = cache
        .channels()
        .add(
            &ChannelPayload::bare(layout.parent, ChannelType::GuildText).without_parent(),
            None,
            AddOptions::default(),
        )
        .unwrap();

    assert_eq!(moved.parent_id, None);
    assert_eq!(cache.channels().thread_ids(layout.parent).unwrap().len(), 2);

    cache
        .handle_dispatch(
            "THREAD_UPDATE",
            json!({ "id": layout.threads[0], "type": 11, "parent_id": null }),
        )
        .unwrap();

    assert_eq!(cache.channels().thread_ids(layout.parent), Some(vec![layout.threads[1]]));
    assert!(cache.channels().contains(layout.threads[0]));
    assert_invariants(&cache).unwrap();
}

#[test]
fn test_channel_update_to_voice_drops_threads() {
    let (_, cache) = setup();
    let layout = threaded_guild(&cache);

    cache
        .handle_dispatch("CHANNEL_UPDATE", json!({ "id": layout.parent, "type": 2 }))
        .unwrap();

    assert_eq!(cache.channels().len(), 1);
    assert_eq!(
        cache.channels().get(layout.parent).unwrap().kind,
        ChannelType::GuildVoice
    );
    assert_invariants(&cache).unwrap();
}

#[test]
fn test_invite_events() {
    let (_, cache) = setup();
    let layout = threaded_guild(&cache);

    cache
        .handle_dispatch(
            "INVITE_CREATE",
            serde_json::to_value(invite("abc", layout.guild, layout.parent)).unwrap(),
        )
        .unwrap();
    assert_eq!(cache.guilds().invites(layout.guild).len(), 1);

    cache
        .handle_dispatch(
            "INVITE_DELETE",
            json!({ "code": "abc", "guild_id": layout.guild, "channel_id": layout.parent }),
        )
        .unwrap();
    assert!(cache.guilds().invites(layout.guild).is_empty());
}

#[test]
fn test_dm_channels_live_outside_guilds() {
    let (_, cache) = setup();
    let id = unique_id();
    cache
        .handle_dispatch(
            "CHANNEL_CREATE",
            serde_json::to_value(dm_channel(id, unique_id())).unwrap(),
        )
        .unwrap();

    let channel = cache.channels().get(id).unwrap();
    assert!(channel.is_dm());
    assert!(channel.guild_id.is_none());
    assert_invariants(&cache).unwrap();
}
