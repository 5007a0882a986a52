// Application state
// Shared handles to the store and the services built on top of it

use crate::chat::{ChatOrchestrator, Turn};
use crate::config::{AppVariant, Config};
use crate::error::AppError;
use crate::export::TranscriptExporter;
use crate::llm::{GeminiClient, Generator};
use crate::references::{ReferenceAugmenter, SearchProvider, SerpApiClient};
use crate::session;
use crate::state::credentials;
use crate::state::store::{SharedStore, Store};
use crate::state::users::User;
use crate::templates::Templates;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;
use tracing::{error, info, warn};

/// Router state
///
/// Cheap to clone; every field is a handle.
#[derive(Clone)]
pub struct AppState {
    /// Served variant
    pub variant: AppVariant,
    /// Users and conversations
    pub store: SharedStore,
    /// Chat orchestrator
    pub orchestrator: ChatOrchestrator,
    /// Reference augmenter, present in the references variant only
    pub augmenter: Option<ReferenceAugmenter>,
    /// Transcript exporter
    pub exporter: TranscriptExporter,
    /// Page templates
    pub templates: Arc<Templates>,
    cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl AppState {
    /// Assemble state from explicit collaborators
    ///
    /// `generator` is `None` when the model could not be initialized.
    pub fn new(
        variant: AppVariant,
        generator: Option<Arc<dyn Generator>>,
        search: Arc<dyn SearchProvider>,
        reference_count: usize,
        secret_key: &str,
    ) -> Result<Self, AppError> {
        let store = Store::shared();
        let orchestrator = ChatOrchestrator::new(generator, store.clone(), variant);
        let augmenter = variant
            .has_references()
            .then(|| ReferenceAugmenter::new(search, store.clone(), reference_count));

        Ok(Self {
            variant,
            store,
            orchestrator,
            augmenter,
            exporter: TranscriptExporter::new(variant.has_references()),
            templates: Arc::new(Templates::new()?),
            cookie_key: session::signing_key(secret_key),
        })
    }

    /// Build state with the Gemini and SerpApi HTTP clients
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.gemini.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        let generator: Option<Arc<dyn Generator>> =
            match (config.variant, config.gemini.api_key.is_some()) {
                (AppVariant::Basic, false) => {
                    error!("FATAL ERROR: Could not initialize Gemini API: GOOGLE_API_KEY is not set");
                    None
                }
                _ => {
                    let client = GeminiClient::from_config(http.clone(), &config.gemini);
                    info!(model = %client.model(), "Gemini API initialized");
                    let generator: Arc<dyn Generator> = Arc::new(client);
                    Some(generator)
                }
            };

        if config.variant.has_references() && config.search.api_key.is_none() {
            warn!("SERPAPI_API_KEY is not set, reference lookups will return no results");
        }
        let search = Arc::new(SerpApiClient::from_config(http, &config.search));

        Self::new(
            config.variant,
            generator,
            search,
            config.search.reference_count,
            &config.session.secret_key,
        )
    }

    /// Register a new user with an empty conversation
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let password = password.to_owned();
        let password_hash = task::spawn_blocking(move || credentials::hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

        let user = User {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        };
        self.store.write().await.register(user)?;
        info!(username = %username, "User registered");
        Ok(())
    }

    /// Check a username/password pair
    ///
    /// Only the hash lookup holds the store lock; Argon2 runs on the blocking pool.
    pub async fn authenticate(&self, username: &str, password: &str) -> bool {
        let Some(password_hash) = self.store.read().await.users.password_hash(username) else {
            return false;
        };

        let password = password.to_owned();
        match task::spawn_blocking(move || credentials::verify_password(&password, &password_hash))
            .await
        {
            Ok(verified) => verified,
            Err(e) => {
                error!(username = %username, error = %e, "Password verification task failed");
                false
            }
        }
    }

    /// Snapshot of a user's turns
    pub async fn conversation(&self, username: &str) -> Result<Vec<Turn>, AppError> {
        self.store
            .read()
            .await
            .conversations
            .turns(username)
            .map(<[Turn]>::to_vec)
            .ok_or_else(|| AppError::ConversationNotFound(username.to_string()))
    }
}
