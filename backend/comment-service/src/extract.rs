use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Multipart, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Form,
};

use crate::models::{NewComment, SearchParams};

type Pairs = Vec<(String, String)>;

/// Reads `name`/`content` from a urlencoded or multipart body. Any other body,
/// or one that fails to decode, yields empty fields instead of a rejection.
#[async_trait]
impl<S> FromRequest<S> for NewComment
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let pairs = if content_type.starts_with("multipart/form-data") {
            multipart_pairs(req, state).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            match Form::<Pairs>::from_request(req, state).await {
                Ok(Form(pairs)) => pairs,
                Err(rejection) => {
                    tracing::warn!(error = %rejection, "unreadable form body");
                    Vec::new()
                }
            }
        } else {
            tracing::debug!(content_type = %content_type, "comment posted without form body");
            Vec::new()
        };

        Ok(NewComment::from_pairs(pairs))
    }
}

async fn multipart_pairs<S>(req: Request, state: &S) -> Pairs
where
    S: Send + Sync,
{
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "unreadable multipart body");
            return Vec::new();
        }
    };

    let mut pairs = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(error = %err, "multipart body ended early");
                break;
            }
        };

        // file uploads are not form values
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match field.text().await {
            Ok(value) => pairs.push((name, value)),
            Err(err) => {
                tracing::warn!(field = %name, error = %err, "unreadable multipart field");
                break;
            }
        }
    }

    pairs
}

/// Reads the `query` parameter; repeated parameters resolve to the first one.
#[async_trait]
impl<S> FromRequestParts<S> for SearchParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = match Query::<Pairs>::from_request_parts(parts, state).await {
            Ok(Query(pairs)) => pairs,
            Err(rejection) => {
                tracing::warn!(error = %rejection, "unreadable query string");
                Vec::new()
            }
        };

        Ok(SearchParams::from_pairs(pairs))
    }
}
