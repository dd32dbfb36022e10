use thiserror::Error;

/// Failures on the tag-generation path. None of these reach a handler:
/// [`crate::tags::Tagger::generate_tags`] maps each one to a fallback list.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("API_KEY environment variable not set")]
    MissingCredential,

    #[error("request to generative-content service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generative-content service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}
