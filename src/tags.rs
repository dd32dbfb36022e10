use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TagError;

/// Returned when no credential is configured. No request is made.
pub const MISSING_KEY_TAGS: [&str; 3] = ["Mock Tag", "AI Analysis", "Creative"];

/// Returned when the service call fails for any reason.
pub const FAILED_TAGS: [&str; 2] = ["API Error", "Tagging Failed"];

// ── Seam ───────────────────────────────────────────────────────────────────

/// A generative-content backend: takes a credential and a prompt, returns
/// the response text (if the model produced any).
#[async_trait]
pub trait ContentModel: Send + Sync {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<Option<String>, TagError>;
}

/// Where the API key comes from. `Env` is read on every call so the key can
/// be set or rotated without a restart.
#[derive(Debug, Clone)]
pub enum Credential {
    Env(String),
    Fixed(Option<String>),
}

impl Credential {
    fn resolve(&self) -> Option<String> {
        let key = match self {
            Credential::Env(var) => std::env::var(var).ok(),
            Credential::Fixed(key) => key.clone(),
        };
        key.filter(|k| !k.trim().is_empty())
    }
}

// ── Tagger ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Tagger {
    model: Arc<dyn ContentModel>,
    credential: Credential,
}

impl Tagger {
    pub fn new(model: Arc<dyn ContentModel>, credential: Credential) -> Self {
        Self { model, credential }
    }

    /// Ask the model for 5–7 comma-separated tags describing the creative.
    ///
    /// Never fails: a missing credential yields [`MISSING_KEY_TAGS`] without
    /// touching the network, any service error yields [`FAILED_TAGS`]. No
    /// retry.
    pub async fn generate_tags(&self, body: &str, title: &str) -> Vec<String> {
        match self.try_generate(body, title).await {
            Ok(tags) => {
                tracing::debug!("generated {} tag(s) for '{}'", tags.len(), title);
                tags
            }
            Err(TagError::MissingCredential) => {
                tracing::error!("{}", TagError::MissingCredential);
                to_owned(&MISSING_KEY_TAGS)
            }
            Err(e) => {
                tracing::error!("Error generating ad tags: {}", e);
                to_owned(&FAILED_TAGS)
            }
        }
    }

    async fn try_generate(&self, body: &str, title: &str) -> Result<Vec<String>, TagError> {
        let api_key = self.credential.resolve().ok_or(TagError::MissingCredential)?;
        let text = self.model.generate(&api_key, &build_prompt(title, body)).await?;
        Ok(text.as_deref().map(split_tags).unwrap_or_default())
    }
}

fn to_owned(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| (*t).to_owned()).collect()
}

pub fn build_prompt(title: &str, body: &str) -> String {
    format!(
        "Analyze the following ad creative content. Based on the title and body, generate a list of 5-7 relevant tags.\n\
         The tags should cover the ad's theme, sentiment, format, and industry.\n\
         Return the tags as a simple comma-separated string.\n\
         \n\
         Title: \"{title}\"\n\
         Body: \"{body}\"\n\
         \n\
         Example output: E-commerce, Fashion, Positive Sentiment, Summer Sale, Product Promotion, Video Ad"
    )
}

/// Split model output on commas and trim each piece. Empty text yields no
/// tags; empty pieces between commas are kept as-is.
pub fn split_tags(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(',').map(|t| t.trim().to_owned()).collect()
}

// ── Gemini backend ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let parts: Vec<String> = content.parts.into_iter().filter_map(|p| p.text).collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }
}

/// Google Gemini `generateContent` over REST.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, TagError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: model.to_owned(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl ContentModel for GeminiClient {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<Option<String>, TagError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TagError::Status { status, body });
        }

        let body: GenerateResponse = resp.json().await?;
        Ok(body.text())
    }
}
