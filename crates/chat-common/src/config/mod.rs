//! Configuration structs

mod app_config;

pub use app_config::{AppSettings, CacheConfig, ClientConfig, ConfigError, Environment};
