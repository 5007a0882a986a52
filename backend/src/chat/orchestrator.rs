//! Chat orchestrator
//!
//! Flow: user message -> Gemini -> append turn -> reply.
//! Failures of the generation call are folded into the reply text; no turn
//! is stored for them.

use crate::chat::models::Turn;
use crate::config::AppVariant;
use crate::llm::Generator;
use crate::state::SharedStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Reply text used when no generation client could be set up
pub const MODEL_NOT_INITIALIZED: &str =
    "Error: The AI model is not initialized. Please check the server logs.";

/// Body of a `/get_response` reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    /// Answer text, or a user-visible error string
    pub response: String,
    /// Position of the stored turn (references variant only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Whether a turn was stored at `index` (references variant only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<bool>,
}

/// Relays messages to the model and records the resulting turns
#[derive(Clone)]
pub struct ChatOrchestrator {
    generator: Option<Arc<dyn Generator>>,
    store: SharedStore,
    variant: AppVariant,
}

impl ChatOrchestrator {
    /// Create an orchestrator; `generator` is `None` when the model is not initialized
    pub fn new(
        generator: Option<Arc<dyn Generator>>,
        store: SharedStore,
        variant: AppVariant,
    ) -> Self {
        Self {
            generator,
            store,
            variant,
        }
    }

    /// Whether a generation client is configured
    pub fn is_initialized(&self) -> bool {
        self.generator.is_some()
    }

    /// Forward `text` to the model and store the answer as a new turn
    ///
    /// Never fails: errors come back as the reply text. In the references
    /// variant a failed call reports the position the turn would have taken.
    pub async fn handle_message(&self, username: &str, text: &str) -> ChatReply {
        let Some(generator) = &self.generator else {
            warn!(username = %username, "Chat request while model is not initialized");
            let index = self.next_index(username).await;
            return self.reply(MODEL_NOT_INITIALIZED.to_string(), index, false);
        };

        info!(username = %username, message_len = text.len(), "Chat request received");

        let answer = match generator.generate(text).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(username = %username, error = %e, "Generation failed");
                let index = self.next_index(username).await;
                return self.reply(format!("Error generating content: {}", e), index, false);
            }
        };

        let appended = self
            .store
            .write()
            .await
            .conversations
            .append(username, Turn::new(text, answer.clone()));

        match appended {
            Ok(index) => {
                info!(
                    username = %username,
                    index = index,
                    response_len = answer.len(),
                    "Turn stored"
                );
                self.reply(answer, index, true)
            }
            Err(e) => {
                error!(username = %username, error = %e, "Failed to store turn");
                let index = self.next_index(username).await;
                self.reply(format!("Error generating content: {}", e), index, false)
            }
        }
    }

    async fn next_index(&self, username: &str) -> usize {
        self.store.read().await.conversations.len(username)
    }

    fn reply(&self, response: String, index: usize, stored: bool) -> ChatReply {
        let references = self.variant.has_references();
        ChatReply {
            response,
            index: references.then_some(index),
            stored: references.then_some(stored),
        }
    }
}
