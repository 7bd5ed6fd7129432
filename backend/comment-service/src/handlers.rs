use axum::{extract::State, http::StatusCode, response::Html, Json};
use chrono::Utc;

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::models::{collect_comments, CommentAdded, CommentList, NewComment, SearchParams};

pub async fn health_handler() -> &'static str {
    "OK"
}

pub async fn landing_page(State(state): State<AppState>) -> Html<String> {
    Html(state.landing_page.to_string())
}

pub async fn create_comment(
    State(state): State<AppState>,
    form: NewComment,
) -> Result<(StatusCode, Json<CommentAdded>)> {
    let comment = form.into_comment(Utc::now());

    state
        .search_backend
        .index_comment(&comment)
        .await
        .map_err(AppError::Indexing)?;

    tracing::debug!(name = %comment.name, "comment indexed");
    Ok((StatusCode::CREATED, Json(CommentAdded::new())))
}

pub async fn search_comments(
    State(state): State<AppState>,
    params: SearchParams,
) -> Result<Json<CommentList>> {
    let hits = state
        .search_backend
        .search_comments(&params.query)
        .await
        .map_err(AppError::Search)?;

    let comments = collect_comments(hits, state.hit_policy)?;

    tracing::debug!(query = %params.query, count = comments.len(), "comment search completed");
    Ok(Json(CommentList { comments }))
}
