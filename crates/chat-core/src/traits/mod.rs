//! Traits (ports) - the interfaces the cache layer depends on

mod network;
mod resolvable;

pub use network::{ChannelHttp, DomainResult, RelationshipLookup};
pub use resolvable::{ChannelResolvable, UserResolvable};
