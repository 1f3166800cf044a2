//! Wire payloads consumed from the network layer

mod channel;
mod guild;

pub use channel::{ChannelPayload, ThreadMetadata};
pub use guild::{GuildPayload, InvitePayload};
