//! HTTP facade over the food extractor
//!
//! This is the only layer that turns extraction outcomes into status codes:
//! an empty answer is a 404, a provider failure is a generic 500.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::ai::gemini::{GeminiFoodClient, GeminiHttpClient};
use crate::ai::FoodExtractor;
use crate::config::Config;
use crate::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared by every request. The extractor is created once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn FoodExtractor>,
}

impl AppState {
    pub fn new(extractor: Arc<dyn FoodExtractor>) -> Self {
        Self { extractor }
    }
}

/// Build the facade router. Routes answer with and without a trailing slash.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/recognize-food/", post(handlers::recognize_food))
        .route("/recognize-food", post(handlers::recognize_food))
        .route("/get-nutrition/", get(handlers::get_nutrition))
        .route("/get-nutrition", get(handlers::get_nutrition))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire the Gemini extractor from `config` and serve until Ctrl+C.
pub async fn run(config: Config) -> Result<()> {
    let http = GeminiHttpClient::new(config.gemini_api_key.clone(), config.gemini_model.clone())
        .with_base_url(config.gemini_base_url.clone())
        .with_timeout(config.gemini_timeout);
    info!(
        "Oracle: Gemini (model: {}, base url: {})",
        http.model(),
        config.gemini_base_url
    );

    let state = AppState::new(Arc::new(GeminiFoodClient::new(http)));
    let app = create_router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("FoodLens API listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
