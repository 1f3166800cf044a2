//! Domain entities - the records held by the client cache

mod channel;
mod guild;
mod invite;
mod relationship;
mod user;

pub use channel::{
    CategoryData, Channel, ChannelData, ChannelShape, ChannelType, DmData, GroupDmData,
    TextData, ThreadData, VoiceData,
};
pub use guild::Guild;
pub use invite::Invite;
pub use relationship::RelationshipType;
pub use user::User;
