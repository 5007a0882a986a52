//! Conversation store
//!
//! Ordered, append-only turn lists keyed by username.

use crate::chat::models::{Turn, TurnId};
use crate::error::AppError;
use std::collections::HashMap;

/// Username -> conversation registry
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: HashMap<String, Vec<Turn>>,
}

impl ConversationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty conversation for `username` if none exists
    pub fn create(&mut self, username: &str) {
        self.conversations.entry(username.to_string()).or_default();
    }

    /// Whether a conversation exists for `username`
    pub fn contains(&self, username: &str) -> bool {
        self.conversations.contains_key(username)
    }

    /// All turns of a user, in order
    pub fn turns(&self, username: &str) -> Option<&[Turn]> {
        self.conversations.get(username).map(Vec::as_slice)
    }

    /// Number of turns of a user (0 when unknown)
    pub fn len(&self, username: &str) -> usize {
        self.conversations.get(username).map_or(0, Vec::len)
    }

    /// Get one turn by position
    pub fn turn(&self, username: &str, index: usize) -> Option<&Turn> {
        self.conversations.get(username)?.get(index)
    }

    /// Append a turn and return its index
    pub fn append(&mut self, username: &str, turn: Turn) -> Result<usize, AppError> {
        let turns = self
            .conversations
            .get_mut(username)
            .ok_or_else(|| AppError::ConversationNotFound(username.to_string()))?;
        turns.push(turn);
        Ok(turns.len() - 1)
    }

    /// Replace the references of the turn at `index`
    ///
    /// The write only happens if that position still holds the turn `id`.
    /// Returns whether the turn was updated.
    pub fn set_references(
        &mut self,
        username: &str,
        index: usize,
        id: TurnId,
        links: Vec<String>,
        images: Vec<String>,
    ) -> bool {
        match self
            .conversations
            .get_mut(username)
            .and_then(|turns| turns.get_mut(index))
        {
            Some(turn) if turn.id == id => {
                turn.links = links;
                turn.images = images;
                true
            }
            _ => false,
        }
    }
}
