use std::time::Duration;

use elasticsearch::{
    http::{
        response::Response,
        transport::{BuildError, SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesExistsParts},
    Elasticsearch, IndexParts, SearchParts,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::models::Comment;

/// Fields searched by the free-text comment query.
pub const SEARCH_FIELDS: [&str; 3] = ["name", "content", "created_at"];

#[derive(Debug, Error)]
pub enum ElasticsearchError {
    #[error("invalid Elasticsearch URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build transport: {0}")]
    TransportBuild(#[from] BuildError),
    #[error("transport error: {0}")]
    Transport(#[from] elasticsearch::Error),
    #[error("elasticsearch returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("creation of index '{0}' was not acknowledged")]
    NotAcknowledged(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Handle to the comment index. Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct ElasticsearchClient {
    client: Elasticsearch,
    comment_index: String,
}

/// A search hit as returned by the store, before conversion into a [`Comment`].
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_source", default)]
    pub source: serde_json::Value,
}

impl ElasticsearchClient {
    pub fn new(
        url: &str,
        comment_index: &str,
        timeout: Duration,
    ) -> Result<Self, ElasticsearchError> {
        let parsed = Url::parse(url)?;
        let pool = SingleNodeConnectionPool::new(parsed);
        let transport = TransportBuilder::new(pool).timeout(timeout).build()?;
        let client = Elasticsearch::new(transport);

        Ok(Self {
            client,
            comment_index: comment_index.to_string(),
        })
    }

    pub fn comment_index(&self) -> &str {
        &self.comment_index
    }

    /// Makes sure the comment index exists, creating it with default settings
    /// when missing. An existing index is left untouched.
    pub async fn ensure_comment_index(&self) -> Result<(), ElasticsearchError> {
        if self.index_exists().await? {
            tracing::info!(index = %self.comment_index, "comment index already exists");
            return Ok(());
        }

        tracing::info!(index = %self.comment_index, "creating comment index");
        if !self.create_index().await? {
            return Err(ElasticsearchError::NotAcknowledged(
                self.comment_index.clone(),
            ));
        }

        Ok(())
    }

    pub async fn index_exists(&self) -> Result<bool, ElasticsearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.comment_index.as_str()]))
            .send()
            .await?;

        let status = response.status_code();
        if status.is_success() {
            Ok(true)
        } else if status.as_u16() == 404 {
            Ok(false)
        } else {
            Err(status_error(response).await)
        }
    }

    /// Creates the comment index and reports whether the store acknowledged it.
    pub async fn create_index(&self) -> Result<bool, ElasticsearchError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.comment_index))
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let created: CreateIndexResponse = response.json().await?;
        Ok(created.acknowledged)
    }

    pub async fn index_comment(&self, comment: &Comment) -> Result<(), ElasticsearchError> {
        let response = self
            .client
            .index(IndexParts::Index(&self.comment_index))
            .body(comment)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    /// Runs a multi-match query over [`SEARCH_FIELDS`] and returns the raw hits
    /// in the store's relevance order.
    pub async fn search_comments(&self, query: &str) -> Result<Vec<SearchHit>, ElasticsearchError> {
        let body = json!({
            "query": {
                "multi_match": {
                    "query": query,
                    "fields": SEARCH_FIELDS,
                    "lenient": true
                }
            }
        });

        let response = self
            .client
            .search(SearchParts::Index(&[self.comment_index.as_str()]))
            .body(body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let search_response: SearchResponse = response.json().await?;
        Ok(search_response.hits.hits)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ElasticsearchError> {
    if response.status_code().is_success() {
        Ok(response)
    } else {
        Err(status_error(response).await)
    }
}

async fn status_error(response: Response) -> ElasticsearchError {
    let status = response.status_code().as_u16();
    let body = error_body(response.text().await);
    ElasticsearchError::Status { status, body }
}

fn error_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    match body {
        Ok(body) => body,
        Err(err) => format!("<unreadable body: {err}>"),
    }
}

#[derive(Debug, Deserialize)]
struct CreateIndexResponse {
    #[serde(default)]
    acknowledged: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: InnerHits,
}

#[derive(Debug, Deserialize)]
struct InnerHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}
