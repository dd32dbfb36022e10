use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod config;
mod error;
mod filter;
mod handlers;
mod jobs;
mod models;
mod tags;
mod view;

use catalog::Catalog;
use jobs::TagJobs;
use tags::{Credential, GeminiClient, Tagger};

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub config: config::AppConfig,
    /// Read-only for the life of the process.
    pub catalog: Catalog,
    pub tagger: Tagger,
    /// Ads with a tag request currently in flight.
    pub tag_jobs: TagJobs,
}

// ── Router ─────────────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/ads", get(handlers::api::list_ads))
        .route("/ads/:id", get(handlers::api::get_ad))
        .route("/ads/:id/tags", post(handlers::api::generate_tags));

    Router::new()
        .route("/", get(handlers::library::index))
        .route("/dashboard", get(handlers::library::dashboard))
        .route("/ads/:id/tags", post(handlers::library::generate_tags))
        .route("/health", get(|| async { axum::http::StatusCode::OK }))
        .nest("/api", api_router)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the variables may come from the environment.
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adminer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = config::AppConfig::from_env()?;
    tracing::info!("Starting AdMiner on {}:{}", config.host, config.port);
    tracing::info!(
        "Tag generation via {} ({})",
        config.gemini_model,
        config.gemini_base_url
    );
    if std::env::var(config::API_KEY_VAR).map_or(true, |k| k.trim().is_empty()) {
        tracing::warn!(
            "{} is not set; tag requests will return placeholder tags",
            config::API_KEY_VAR
        );
    }

    // Tag generation backend; the key itself is looked up per request
    let gemini = GeminiClient::new(
        &config.gemini_base_url,
        &config.gemini_model,
        Duration::from_secs(config.tag_timeout_secs),
    )
    .context("failed to build HTTP client for tag generation")?;
    let tagger = Tagger::new(
        Arc::new(gemini),
        Credential::Env(config::API_KEY_VAR.to_owned()),
    );

    let bind_addr = format!("{}:{}", config.host, config.port);

    // Build shared state
    let state = Arc::new(AppState {
        config,
        catalog: Catalog::mock(),
        tagger,
        tag_jobs: TagJobs::new(),
    });

    let app = router(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::response::Response;

    pub fn test_config() -> config::AppConfig {
        config::AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            gemini_model: "gemini-2.5-flash".into(),
            gemini_base_url: "http://127.0.0.1:9".into(),
            tag_timeout_secs: 1,
        }
    }

    /// Mock catalog and a tagger with no credential, so no test reaches the
    /// network.
    pub fn test_state() -> Arc<AppState> {
        let config = test_config();
        let gemini = GeminiClient::new(
            &config.gemini_base_url,
            &config.gemini_model,
            Duration::from_secs(config.tag_timeout_secs),
        )
        .unwrap();
        Arc::new(AppState {
            config,
            catalog: Catalog::mock(),
            tagger: Tagger::new(Arc::new(gemini), Credential::Fixed(None)),
            tag_jobs: TagJobs::new(),
        })
    }

    pub async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        use axum::{body::Body, http::Request};
        use tower::ServiceExt;

        let resp = router(test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), axum::http::StatusCode::OK);
    }
}
