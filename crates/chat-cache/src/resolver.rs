//! Channel variant resolution
//!
//! Maps a raw payload's type discriminator onto the concrete record shape and
//! decides whether a guild context is required to build it.

use chat_core::{Channel, ChannelPayload, ChannelType, Snowflake};
use thiserror::Error;

/// Soft failure: the payload cannot become a record right now.
///
/// Never fatal to the caller; the manager logs it and yields no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unknown type {} for channel {id}", .kind.as_i16())]
    UnknownType { id: Snowflake, kind: ChannelType },

    #[error("no guild available for guild channel {id} of type {}", .kind.as_i16())]
    MissingGuild { id: Snowflake, kind: ChannelType },
}

/// Build the record matching `payload`'s discriminator.
///
/// `guild` is the resolvable guild context, if any; guild-scoped types
/// without one fail unless `allow_unknown_guild` is set, in which case the
/// record keeps whatever guild id the payload carried.
pub fn resolve_channel(
    payload: &ChannelPayload,
    guild: Option<Snowflake>,
    allow_unknown_guild: bool,
) -> Result<Channel, ResolveError> {
    let mut channel = Channel::from_payload(payload).ok_or(ResolveError::UnknownType {
        id: payload.id,
        kind: payload.kind,
    })?;

    if payload.kind.is_guild_scoped() {
        match guild {
            Some(guild_id) => channel.guild_id = Some(guild_id),
            None if allow_unknown_guild => {}
            None => {
                return Err(ResolveError::MissingGuild {
                    id: payload.id,
                    kind: payload.kind,
                })
            }
        }
    }

    Ok(channel)
}
