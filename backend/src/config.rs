//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::fmt;
use std::str::FromStr;

/// Fallback used when `SECRET_KEY` is not set. Only suitable for development.
pub const DEFAULT_SECRET_KEY: &str = "a_default_secret_key_for_development";

/// Default Gemini model name
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";

/// Default Gemini API base URL
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default SerpApi base URL
pub const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";

/// Default number of links and images attached to a turn
pub const DEFAULT_REFERENCE_COUNT: usize = 3;

/// Which flavour of the chat app is served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppVariant {
    /// Plain chat: `{response}` replies, no references, no contact page
    Basic,
    /// Chat with `{response, index}` replies, reference lookup and contact page
    #[default]
    References,
}

impl AppVariant {
    /// Whether the reference augmenter and its routes are enabled
    pub fn has_references(&self) -> bool {
        matches!(self, AppVariant::References)
    }

    /// Lowercase name, as accepted by `APP_VARIANT`
    pub fn as_str(&self) -> &'static str {
        match self {
            AppVariant::Basic => "basic",
            AppVariant::References => "references",
        }
    }
}

impl fmt::Display for AppVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(AppVariant::Basic),
            "references" => Ok(AppVariant::References),
            other => Err(format!("unknown app variant: {}", other)),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Served variant
    pub variant: AppVariant,
    /// Generation API configuration
    pub gemini: GeminiConfig,
    /// Search API configuration
    pub search: SearchConfig,
    /// Session cookie configuration
    pub session: SessionConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Gemini API configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key, `None` when `GOOGLE_API_KEY` is unset
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

/// SerpApi configuration
#[derive(Clone)]
pub struct SearchConfig {
    /// API key, `None` when `SERPAPI_API_KEY` is unset
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Maximum number of links and images per lookup
    pub reference_count: usize,
}

/// Session configuration
#[derive(Clone)]
pub struct SessionConfig {
    /// Secret used to sign the session cookie
    pub secret_key: String,
    /// True when `SECRET_KEY` was missing and the fallback is in use
    pub using_fallback_secret: bool,
}

// Keys and secrets never reach the logs.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("reference_count", &self.reference_count)
            .finish()
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret_key", &"<redacted>")
            .field("using_fallback_secret", &self.using_fallback_secret)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let secret = non_empty_var("SECRET_KEY");
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(5000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            variant: env::var("APP_VARIANT")
                .ok()
                .and_then(|v| match v.parse() {
                    Ok(variant) => Some(variant),
                    Err(e) => {
                        tracing::warn!("{}, falling back to default", e);
                        None
                    }
                })
                .unwrap_or_default(),
            gemini: GeminiConfig {
                api_key: non_empty_var("GOOGLE_API_KEY"),
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: env::var("GEMINI_API_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
                timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(60),
            },
            search: SearchConfig {
                api_key: non_empty_var("SERPAPI_API_KEY"),
                base_url: env::var("SERPAPI_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_SERPAPI_BASE_URL.to_string()),
                reference_count: env::var("REFERENCE_COUNT")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(DEFAULT_REFERENCE_COUNT),
            },
            session: SessionConfig {
                using_fallback_secret: secret.is_none(),
                secret_key: secret.unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
