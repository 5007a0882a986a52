//! Gemini API client
//!
//! Direct HTTP client for the Gemini `generateContent` endpoint.
//! The prompt is forwarded verbatim as a single-turn request.

use crate::config::GeminiConfig;
use crate::error::AppError;
use crate::llm::gemini_types::{GeminiApiRequest, GeminiApiResponse};
use crate::llm::Generator;
use async_trait::async_trait;

/// Gemini client bound to one API key and model
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client using a shared HTTP client (connection pooling)
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from configuration. A missing key becomes an empty
    /// key, which every call rejects.
    pub fn from_config(client: reqwest::Client, config: &GeminiConfig) -> Self {
        Self::new(
            client,
            config.api_key.clone().unwrap_or_default(),
            config.model.clone(),
            config.base_url.clone(),
        )
    }

    /// Model name requests are sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Call Gemini with `prompt` and return the concatenated answer text
    ///
    /// # Errors
    /// * Returns `AppError::Generation` if the API key is empty, the HTTP
    ///   request fails, the response cannot be parsed, the prompt was
    ///   blocked, or no text is found in the response.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::Generation("API key is empty".to_string()));
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request_body = GeminiApiRequest::from_prompt(prompt);

        tracing::debug!(
            url = %url,
            model = %self.model,
            prompt_len = prompt.len(),
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                AppError::Generation(format!("Failed to send HTTP request to Gemini API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Gemini API returned error status"
            );

            if status_code == 429 {
                return Err(AppError::Generation(format!(
                    "Gemini API rate limit exceeded (HTTP {}): {}",
                    status_code, error_body
                )));
            }

            return Err(AppError::Generation(format!(
                "Gemini API returned error status {}: {}",
                status_code, error_body
            )));
        }

        let response_body = response.text().await.map_err(|e| {
            AppError::Generation(format!(
                "Failed to read response body from Gemini API: {}",
                e
            ))
        })?;

        let parsed: GeminiApiResponse = serde_json::from_str(&response_body).map_err(|e| {
            AppError::Generation(format!(
                "Failed to parse JSON response from Gemini API: {} - Response body: {}",
                e, response_body
            ))
        })?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_ref())
        {
            return Err(AppError::Generation(format!(
                "Gemini API blocked the prompt: {}",
                reason
            )));
        }

        let candidate = parsed.candidates.first().ok_or_else(|| {
            AppError::Generation("Gemini API response contains no candidates".to_string())
        })?;

        let text: String = candidate
            .content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();

        if text.is_empty() {
            return Err(AppError::Generation(
                "Gemini API response text is empty".to_string(),
            ));
        }

        tracing::debug!(
            response_len = text.len(),
            "Successfully received response from Gemini API"
        );

        Ok(text)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        self.generate_content(prompt).await
    }
}
