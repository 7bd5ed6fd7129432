use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::elasticsearch::ElasticsearchError;
use crate::models::ErrorBody;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Error indexing comment: {0}")]
    Indexing(#[source] ElasticsearchError),

    #[error("Error searching comments: {0}")]
    Search(#[source] ElasticsearchError),

    #[error("Error unmarshalling search result: {0}")]
    Unmarshal(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");

        let body = Json(ErrorBody {
            error: self.to_string(),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
