//! Process-wide in-memory store
//!
//! Users and conversations live behind one lock so that registration creates
//! both records atomically.

use crate::error::AppError;
use crate::state::conversations::ConversationStore;
use crate::state::users::{User, UserStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the store
pub type SharedStore = Arc<RwLock<Store>>;

/// Credential and conversation registries
#[derive(Debug, Default)]
pub struct Store {
    /// Registered users
    pub users: UserStore,
    /// Per-user conversations
    pub conversations: ConversationStore,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store wrapped for sharing
    pub fn shared() -> SharedStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Register a user and give them an empty conversation
    pub fn register(&mut self, user: User) -> Result<(), AppError> {
        let username = user.username.clone();
        self.users.insert(user)?;
        self.conversations.create(&username);
        Ok(())
    }
}
