//! Relationship manager
//!
//! Tracks how the current user relates to other users. Only the friend check
//! matters to the channel cache; the rest is kept for callers.

use chat_core::{RelationshipLookup, RelationshipType, Snowflake};
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent map from user id to relationship
#[derive(Debug, Default)]
pub struct RelationshipManager {
    relationships: DashMap<Snowflake, RelationshipType>,
}

impl RelationshipManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Record a relationship; `None` clears it
    pub fn set(&self, user_id: Snowflake, kind: RelationshipType) {
        if kind == RelationshipType::None {
            self.relationships.remove(&user_id);
        } else {
            self.relationships.insert(user_id, kind);
        }
        tracing::trace!(user_id = %user_id, kind = ?kind, "Relationship updated");
    }

    pub fn remove(&self, user_id: Snowflake) -> Option<RelationshipType> {
        self.relationships.remove(&user_id).map(|(_, kind)| kind)
    }

    pub fn get(&self, user_id: Snowflake) -> RelationshipType {
        self.relationships
            .get(&user_id)
            .map(|r| *r)
            .unwrap_or_default()
    }

    /// Ids of every friend, in no particular order
    pub fn friends(&self) -> Vec<Snowflake> {
        self.relationships
            .iter()
            .filter(|r| *r.value() == RelationshipType::Friend)
            .map(|r| *r.key())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}

impl RelationshipLookup for RelationshipManager {
    fn is_friend(&self, user_id: Snowflake) -> bool {
        self.get(user_id) == RelationshipType::Friend
    }
}
