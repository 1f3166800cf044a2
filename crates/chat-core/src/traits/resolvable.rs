//! Conversions from caller input to canonical ids

use crate::entities::{Channel, User};
use crate::value_objects::Snowflake;

/// Anything that identifies a channel: a record, an id, or an id string
pub trait ChannelResolvable {
    /// The channel id, if the input names one
    fn channel_id(&self) -> Option<Snowflake>;

    /// The record itself, when the input is one
    fn as_channel(&self) -> Option<&Channel> {
        None
    }
}

impl ChannelResolvable for Snowflake {
    fn channel_id(&self) -> Option<Snowflake> {
        Some(*self)
    }
}

impl ChannelResolvable for Channel {
    fn channel_id(&self) -> Option<Snowflake> {
        Some(self.id)
    }

    fn as_channel(&self) -> Option<&Channel> {
        Some(self)
    }
}

impl ChannelResolvable for str {
    fn channel_id(&self) -> Option<Snowflake> {
        Snowflake::parse(self).ok()
    }
}

impl ChannelResolvable for String {
    fn channel_id(&self) -> Option<Snowflake> {
        self.as_str().channel_id()
    }
}

impl<T: ChannelResolvable + ?Sized> ChannelResolvable for &T {
    fn channel_id(&self) -> Option<Snowflake> {
        (**self).channel_id()
    }

    fn as_channel(&self) -> Option<&Channel> {
        (**self).as_channel()
    }
}

/// Anything that identifies a user: a record, an id, or an id string
pub trait UserResolvable {
    /// The user id, if the input names one
    fn user_id(&self) -> Option<Snowflake>;
}

impl UserResolvable for Snowflake {
    fn user_id(&self) -> Option<Snowflake> {
        Some(*self)
    }
}

impl UserResolvable for User {
    fn user_id(&self) -> Option<Snowflake> {
        Some(self.id)
    }
}

impl UserResolvable for str {
    fn user_id(&self) -> Option<Snowflake> {
        Snowflake::parse(self).ok()
    }
}

impl UserResolvable for String {
    fn user_id(&self) -> Option<Snowflake> {
        self.as_str().user_id()
    }
}

impl<T: UserResolvable + ?Sized> UserResolvable for &T {
    fn user_id(&self) -> Option<Snowflake> {
        (**self).user_id()
    }
}
