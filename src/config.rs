use anyhow::{Context, Result};

/// Name of the environment variable holding the Gemini API key. Read on
/// every tag request rather than at startup.
pub const API_KEY_VAR: &str = "API_KEY";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Gemini model used for tag generation
    pub gemini_model: String,

    /// Base URL of the Gemini REST API, without a trailing slash
    pub gemini_base_url: String,

    /// Upper bound on a single tag-generation call
    pub tag_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = get("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1–65535)")?;

        let tag_timeout_secs = get("TAG_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse::<u64>()
            .context("TAG_TIMEOUT_SECS must be a whole number of seconds")?;

        if tag_timeout_secs == 0 {
            anyhow::bail!("TAG_TIMEOUT_SECS must be greater than zero");
        }

        let gemini_base_url = get("GEMINI_BASE_URL")
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com".into())
            .trim_end_matches('/')
            .to_owned();

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.5-flash".into()),
            gemini_base_url,
            tag_timeout_secs,
        })
    }
}
