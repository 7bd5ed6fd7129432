use std::{path::Path, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::elasticsearch::ElasticsearchClient;
use crate::error::AppError;
use crate::handlers;
use crate::models::HitPolicy;

pub const LANDING_TEMPLATE: &str = "index.html";

#[derive(Clone)]
pub struct AppState {
    pub search_backend: Arc<ElasticsearchClient>,
    pub hit_policy: HitPolicy,
    pub landing_page: Arc<str>,
}

impl AppState {
    pub fn new(
        search_backend: ElasticsearchClient,
        hit_policy: HitPolicy,
        landing_page: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            search_backend: Arc::new(search_backend),
            hit_policy,
            landing_page: landing_page.into(),
        }
    }
}

/// Reads the landing page template once so a missing file fails at startup
/// instead of on the first request.
pub async fn load_landing_page(template_dir: &Path) -> Result<String, AppError> {
    let path = template_dir.join(LANDING_TEMPLATE);
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| AppError::Template(format!("failed to read {}: {e}", path.display())))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::landing_page))
        .route("/health", get(handlers::health_handler))
        .route("/comment", post(handlers::create_comment))
        .route("/search", get(handlers::search_comments))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
