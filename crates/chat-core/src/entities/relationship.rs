//! Relationship types between the current user and other users

use serde::{Deserialize, Serialize};

/// Relationship kind, as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "u8", into = "u8")]
pub enum RelationshipType {
    #[default]
    None,
    Friend,
    Blocked,
    IncomingRequest,
    OutgoingRequest,
}

impl From<u8> for RelationshipType {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Friend,
            2 => Self::Blocked,
            3 => Self::IncomingRequest,
            4 => Self::OutgoingRequest,
            _ => Self::None,
        }
    }
}

impl From<RelationshipType> for u8 {
    fn from(kind: RelationshipType) -> Self {
        match kind {
            RelationshipType::None => 0,
            RelationshipType::Friend => 1,
            RelationshipType::Blocked => 2,
            RelationshipType::IncomingRequest => 3,
            RelationshipType::OutgoingRequest => 4,
        }
    }
}
