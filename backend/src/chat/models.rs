//! Chat data models
//!
//! Defines the turn structure stored per user.

use uuid::Uuid;

/// Stable identifier of a turn
pub type TurnId = Uuid;

/// One question/answer exchange, optionally annotated with references
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Unique identifier, stable across appends
    pub id: TurnId,
    /// The user's message, as sent to the model
    pub question: String,
    /// The model's answer
    pub answer: String,
    /// Web result URLs, filled in by reference lookup
    pub links: Vec<String>,
    /// Image result URLs, filled in by reference lookup
    pub images: Vec<String>,
}

impl Turn {
    /// Create a new turn with no references
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            answer: answer.into(),
            links: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Whether reference lookup attached anything to this turn
    pub fn has_references(&self) -> bool {
        !self.links.is_empty() || !self.images.is_empty()
    }
}
