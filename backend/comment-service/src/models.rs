use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::elasticsearch::SearchHit;

/// A stored comment. `created_at` is always stamped by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(name: String, content: String, created_at: DateTime<Utc>) -> Self {
        Self {
            name,
            content,
            created_at,
        }
    }
}

/// Form payload of `POST /comment`. Missing fields are accepted as empty strings.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NewComment {
    pub name: String,
    pub content: String,
}

impl NewComment {
    /// Builds the payload from decoded form pairs. The first value of a
    /// repeated field wins and unknown fields are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut name = None;
        let mut content = None;

        for (key, value) in pairs {
            match key.as_str() {
                "name" if name.is_none() => name = Some(value),
                "content" if content.is_none() => content = Some(value),
                _ => {}
            }
        }

        Self {
            name: name.unwrap_or_default(),
            content: content.unwrap_or_default(),
        }
    }

    pub fn into_comment(self, created_at: DateTime<Utc>) -> Comment {
        Comment::new(self.name, self.content, created_at)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
}

impl SearchParams {
    /// First `query` parameter wins; absent means the empty string.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let query = pairs
            .into_iter()
            .find(|(key, _)| key == "query")
            .map(|(_, value)| value)
            .unwrap_or_default();

        Self { query }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentAdded {
    pub result: &'static str,
}

impl CommentAdded {
    pub const MESSAGE: &'static str = "Comment added";

    pub fn new() -> Self {
        Self {
            result: Self::MESSAGE,
        }
    }
}

impl Default for CommentAdded {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct CommentList {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// What to do with a search hit that does not deserialize into a [`Comment`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// Abort the whole search on the first malformed hit.
    #[default]
    FailFast,
    /// Drop malformed hits with a warning and keep the rest.
    SkipInvalid,
}

/// Converts raw hits into comments, preserving the store's order.
pub fn collect_comments(
    hits: Vec<SearchHit>,
    policy: HitPolicy,
) -> Result<Vec<Comment>, serde_json::Error> {
    let mut comments = Vec::with_capacity(hits.len());

    for hit in hits {
        match serde_json::from_value::<Comment>(hit.source) {
            Ok(comment) => comments.push(comment),
            Err(err) => match policy {
                HitPolicy::FailFast => return Err(err),
                HitPolicy::SkipInvalid => {
                    tracing::warn!(
                        hit_id = hit.id.as_deref().unwrap_or("<unknown>"),
                        error = %err,
                        "skipping malformed search hit"
                    );
                }
            },
        }
    }

    Ok(comments)
}
