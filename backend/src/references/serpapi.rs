//! SerpApi search client
//!
//! Web results come from the `google` engine (`organic_results[].link`),
//! images from `google_images` (`images_results[].original`).

use crate::config::SearchConfig;
use crate::error::AppError;
use crate::references::SearchProvider;
use async_trait::async_trait;
use serde::Deserialize;

/// Subset of a SerpApi `search.json` response
#[derive(Deserialize, Debug, Default)]
pub struct SerpApiResponse {
    /// Organic web results
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
    /// Image results
    #[serde(default)]
    pub images_results: Vec<ImageResult>,
    /// Error message reported in a 200 body
    #[serde(default)]
    pub error: Option<String>,
}

/// One organic web result
#[derive(Deserialize, Debug)]
pub struct OrganicResult {
    /// Result URL
    #[serde(default)]
    pub link: Option<String>,
}

/// One image result
#[derive(Deserialize, Debug)]
pub struct ImageResult {
    /// Full-size image URL
    #[serde(default)]
    pub original: Option<String>,
    /// Thumbnail URL, used when `original` is missing
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// SerpApi client bound to one API key
#[derive(Clone)]
pub struct SerpApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SerpApiClient {
    /// Create a client using a shared HTTP client
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from configuration. A missing key makes every search fail.
    pub fn from_config(client: reqwest::Client, config: &SearchConfig) -> Self {
        Self::new(
            client,
            config.api_key.clone().unwrap_or_default(),
            config.base_url.clone(),
        )
    }

    async fn search(&self, engine: &str, query: &str) -> Result<SerpApiResponse, AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::Search("API key is empty".to_string()));
        }

        let url = format!("{}/search.json", self.base_url);
        tracing::debug!(engine = %engine, query_len = query.len(), "Calling SerpApi");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("engine", engine),
                ("q", query),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Failed to send request to SerpApi: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(AppError::Search(format!(
                "SerpApi returned error status {}: {}",
                status.as_u16(),
                error_body
            )));
        }

        let parsed: SerpApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse SerpApi response: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(AppError::Search(error));
        }

        Ok(parsed)
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search_links(&self, query: &str, limit: usize) -> Result<Vec<String>, AppError> {
        let response = self.search("google", query).await?;
        Ok(response
            .organic_results
            .into_iter()
            .filter_map(|result| result.link)
            .take(limit)
            .collect())
    }

    async fn search_images(&self, query: &str, limit: usize) -> Result<Vec<String>, AppError> {
        let response = self.search("google_images", query).await?;
        Ok(response
            .images_results
            .into_iter()
            .filter_map(|result| result.original.or(result.thumbnail))
            .take(limit)
            .collect())
    }
}
