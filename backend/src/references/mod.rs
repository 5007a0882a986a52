//! Reference augmenter
//!
//! Looks up web and image results for a stored question and attaches them to
//! the turn. Search failures count as "no results".

pub mod serpapi;

pub use serpapi::SerpApiClient;

use crate::error::AppError;
use crate::state::SharedStore;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// A web/image search backend
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// URLs of organic web results for `query`, at most `limit`
    async fn search_links(&self, query: &str, limit: usize) -> Result<Vec<String>, AppError>;

    /// URLs of image results for `query`, at most `limit`
    async fn search_images(&self, query: &str, limit: usize) -> Result<Vec<String>, AppError>;
}

/// Body of a successful `/get_references` reply
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct References {
    /// Web result URLs
    pub links: Vec<String>,
    /// Image result URLs
    pub images: Vec<String>,
}

/// Enriches stored turns with search results
#[derive(Clone)]
pub struct ReferenceAugmenter {
    search: Arc<dyn SearchProvider>,
    store: SharedStore,
    limit: usize,
}

impl ReferenceAugmenter {
    /// Create an augmenter keeping at most `limit` links and images per turn
    pub fn new(search: Arc<dyn SearchProvider>, store: SharedStore, limit: usize) -> Self {
        Self {
            search,
            store,
            limit,
        }
    }

    /// Look up references for the turn at `index` and store them on it
    ///
    /// # Errors
    /// * `AppError::InvalidIndex` if `index` is outside the conversation.
    ///   Nothing is mutated in that case.
    pub async fn fetch_references(
        &self,
        username: &str,
        index: i64,
    ) -> Result<References, AppError> {
        let position = usize::try_from(index).map_err(|_| AppError::InvalidIndex)?;
        let (turn_id, question) = {
            let store = self.store.read().await;
            let turn = store
                .conversations
                .turn(username, position)
                .ok_or(AppError::InvalidIndex)?;
            (turn.id, turn.question.clone())
        };

        let (links, images) = tokio::join!(
            self.search.search_links(&question, self.limit),
            self.search.search_images(&question, self.limit),
        );
        let references = References {
            links: self.or_empty(links, "web"),
            images: self.or_empty(images, "image"),
        };

        let updated = self.store.write().await.conversations.set_references(
            username,
            position,
            turn_id,
            references.links.clone(),
            references.images.clone(),
        );
        if !updated {
            warn!(username = %username, index = position, "Turn changed during reference lookup");
        }

        info!(
            username = %username,
            index = position,
            links = references.links.len(),
            images = references.images.len(),
            "References attached"
        );

        Ok(references)
    }

    fn or_empty(&self, result: Result<Vec<String>, AppError>, kind: &str) -> Vec<String> {
        match result {
            Ok(mut urls) => {
                urls.truncate(self.limit);
                urls
            }
            Err(e) => {
                warn!(kind = kind, error = %e, "Search failed, treating as no results");
                Vec::new()
            }
        }
    }
}
