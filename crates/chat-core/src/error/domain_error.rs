//! Domain errors - hard failures that abort the operation that raised them

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    // =========================================================================
    // Argument Errors
    // =========================================================================
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // Network Errors (reported by the session layer)
    // =========================================================================
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed payload: {0}")]
    Decode(String),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Get an error code string for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ChannelNotFound(_) | Self::GuildNotFound(_) | Self::UserNotFound(_)
        )
    }

    /// Check if the caller passed arguments that can never succeed
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this came from the network layer's transport
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_))
    }
}
