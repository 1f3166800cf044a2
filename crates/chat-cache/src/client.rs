//! Client cache - container for every manager of one client session
//!
//! Built once per session from the cache configuration and the network port,
//! then fed gateway dispatches through [`ClientCache::handle`].

use std::sync::Arc;

use chat_common::{try_init_tracing_with_config, CacheConfig, ClientConfig, TracingConfig};
use chat_core::{Channel, ChannelHttp, DomainError, DomainResult, Invite, Snowflake};
use serde_json::Value;
use tracing::instrument;

use crate::collection::CacheOptions;
use crate::events::GatewayEvent;
use crate::managers::{AddOptions, ChannelManager, GuildManager, RelationshipManager};
use crate::state::CacheState;

/// Container for the channel, guild and relationship managers
#[derive(Clone)]
pub struct ClientCache {
    channels: Arc<ChannelManager>,
    guilds: Arc<GuildManager>,
    relationships: Arc<RelationshipManager>,
}

impl ClientCache {
    /// Create a cache with the limits in `config`
    pub fn new(config: &CacheConfig, http: Arc<dyn ChannelHttp>) -> Self {
        ClientCacheBuilder::new().config(*config).build_with(http)
    }

    /// Create a cache for a client session configured by `config`.
    ///
    /// Installs the tracing subscriber for the configured environment unless
    /// the process already has one.
    pub fn from_config(config: &ClientConfig, http: Arc<dyn ChannelHttp>) -> Self {
        if try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)).is_ok() {
            tracing::debug!(env = ?config.app.env, "Tracing initialized");
        }
        tracing::info!(app = %config.app.name, cache = ?config.cache, "Client cache starting");
        Self::new(&config.cache, http)
    }

    /// Load the client configuration from the environment, then create a cache
    ///
    /// # Errors
    /// `DomainError::InvalidArgument` when a configuration variable is malformed.
    pub fn from_env(http: Arc<dyn ChannelHttp>) -> DomainResult<Self> {
        let config =
            ClientConfig::from_env().map_err(|e| DomainError::invalid_argument(e.to_string()))?;
        Ok(Self::from_config(&config, http))
    }

    /// Start building a cache with custom policies
    #[must_use]
    pub fn builder() -> ClientCacheBuilder {
        ClientCacheBuilder::new()
    }

    /// Get the channel manager
    pub fn channels(&self) -> &ChannelManager {
        self.channels.as_ref()
    }

    /// Get the guild manager
    pub fn guilds(&self) -> &GuildManager {
        self.guilds.as_ref()
    }

    /// Get the relationship manager
    pub fn relationships(&self) -> &RelationshipManager {
        self.relationships.as_ref()
    }

    /// Decode and apply a raw dispatch.
    ///
    /// Dispatches the cache does not consume are ignored.
    ///
    /// # Errors
    /// `DomainError::Decode` when a consumed dispatch is malformed; the cache
    /// is left untouched then.
    pub fn handle_dispatch(&self, name: &str, data: Value) -> DomainResult<()> {
        if let Some(event) = GatewayEvent::from_dispatch(name, data)? {
            self.handle(event);
        }
        Ok(())
    }

    /// Apply a gateway event to the cache
    #[instrument(skip(self, event), fields(event = %event.kind()))]
    pub fn handle(&self, event: GatewayEvent) {
        match event {
            GatewayEvent::GuildCreate(payload) => {
                self.guilds.add(&payload);
            }
            GatewayEvent::GuildDelete(payload) => {
                if payload.unavailable {
                    self.guilds.mark_unavailable(payload.id);
                } else {
                    self.guilds.remove(payload.id);
                }
            }
            GatewayEvent::ChannelCreate(payload)
            | GatewayEvent::ChannelUpdate(payload)
            | GatewayEvent::ThreadCreate(payload)
            | GatewayEvent::ThreadUpdate(payload) => {
                self.channels.add(&payload, None, AddOptions::default());
            }
            GatewayEvent::ChannelDelete(payload) | GatewayEvent::ThreadDelete(payload) => {
                self.channels.remove(payload.id);
            }
            GatewayEvent::ThreadListSync(sync) => {
                self.channels.sync_threads(
                    sync.guild_id,
                    sync.channel_ids.as_deref(),
                    &sync.threads,
                );
            }
            GatewayEvent::InviteCreate(payload) => {
                self.guilds.add_invite(&payload);
            }
            GatewayEvent::InviteDelete(payload) => {
                self.guilds.remove_invite(payload.guild_id, &payload.code);
            }
            GatewayEvent::RelationshipAdd(payload) => {
                self.relationships.set(payload.id, payload.kind);
            }
            GatewayEvent::RelationshipRemove(payload) => {
                self.relationships.remove(payload.id);
            }
        }
    }
}

impl std::fmt::Debug for ClientCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCache")
            .field("channels", &self.channels.len())
            .field("guilds", &self.guilds.len())
            .field("relationships", &self.relationships.len())
            .finish()
    }
}

/// Builder for a [`ClientCache`] with custom cache policies
#[derive(Default)]
pub struct ClientCacheBuilder {
    http: Option<Arc<dyn ChannelHttp>>,
    config: CacheConfig,
    channel_options: Option<CacheOptions<Snowflake, Channel>>,
    relationships: Option<Arc<RelationshipManager>>,
}

impl ClientCacheBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn http(mut self, http: Arc<dyn ChannelHttp>) -> Self {
        self.http = Some(http);
        self
    }

    /// Size limits; overridden per cache by the explicit option setters
    #[must_use]
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Channel cache policy, including a keep-over-limit predicate
    #[must_use]
    pub fn channel_options(mut self, options: CacheOptions<Snowflake, Channel>) -> Self {
        self.channel_options = Some(options);
        self
    }

    /// Share an existing relationship store
    #[must_use]
    pub fn relationships(mut self, relationships: Arc<RelationshipManager>) -> Self {
        self.relationships = Some(relationships);
        self
    }

    /// Build the cache
    ///
    /// # Errors
    /// Returns `DomainError::InvalidArgument` if no HTTP port was supplied
    pub fn build(mut self) -> DomainResult<ClientCache> {
        let http = self
            .http
            .take()
            .ok_or_else(|| DomainError::invalid_argument("http is required"))?;
        Ok(self.build_with(http))
    }

    fn build_with(self, http: Arc<dyn ChannelHttp>) -> ClientCache {
        let channel_options = self
            .channel_options
            .unwrap_or_else(|| limit(self.config.channels_max_size));
        let invite_options: CacheOptions<String, Invite> = limit(self.config.invites_max_size);

        let state = CacheState::new(channel_options, invite_options).shared();
        let relationships = self.relationships.unwrap_or_default();

        let cache = ClientCache {
            channels: Arc::new(ChannelManager::new(
                state.clone(),
                http,
                relationships.clone(),
            )),
            guilds: Arc::new(GuildManager::new(state)),
            relationships,
        };
        tracing::debug!(config = ?self.config, "Client cache ready");
        cache
    }
}

fn limit<K, V>(max_size: Option<usize>) -> CacheOptions<K, V> {
    max_size.map_or_else(CacheOptions::unbounded, CacheOptions::limited)
}
