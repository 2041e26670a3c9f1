use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::activity::ActivityKind;

/// What the bot is waiting for from a user. Stored per user id; `Idle` is
/// the implicit default and is never kept in the map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingName,
    AwaitingClass {
        name: String,
    },
    AwaitingQuantity {
        kind: ActivityKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    pub name: String,
    pub class: String,
    pub display_name: String,
    pub registered_at: DateTime<Utc>,
}

/// Conversation State Store. A single lock keeps each read/write atomic;
/// two events for the same user in one batch still race (last writer wins),
/// which is acceptable at this bot's traffic.
#[derive(Default)]
pub struct StateStore {
    map: RwLock<HashMap<String, ConversationState>>,
}

impl StateStore {
    pub async fn get(&self, user_id: &str) -> ConversationState {
        self.map.read().await.get(user_id).cloned().unwrap_or_default()
    }

    /// Replaces the user's pending state. Writing `Idle` removes the entry.
    pub async fn set(&self, user_id: &str, state: ConversationState) {
        let mut map = self.map.write().await;
        if state == ConversationState::Idle {
            map.remove(user_id);
        } else {
            map.insert(user_id.to_owned(), state);
        }
    }

    pub async fn clear(&self, user_id: &str) {
        self.map.write().await.remove(user_id);
    }
}

/// Registered User Store. Entries live for the process lifetime; there is
/// no deletion path and re-registration overwrites.
#[derive(Default)]
pub struct UserStore {
    map: RwLock<HashMap<String, RegisteredUser>>,
}

impl UserStore {
    pub async fn get(&self, user_id: &str) -> Option<RegisteredUser> {
        self.map.read().await.get(user_id).cloned()
    }

    pub async fn is_registered(&self, user_id: &str) -> bool {
        self.map.read().await.contains_key(user_id)
    }

    pub async fn insert(&self, user_id: &str, user: RegisteredUser) {
        self.map.write().await.insert(user_id.to_owned(), user);
    }
}
