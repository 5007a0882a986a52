//! Generation API
//!
//! The chat orchestrator talks to the model through the `Generator` trait so
//! the HTTP client can be swapped for a fake in tests.

pub mod gemini;
pub mod gemini_types;

pub use gemini::GeminiClient;

use crate::error::AppError;
use async_trait::async_trait;

/// Something that turns a prompt into an answer
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}
