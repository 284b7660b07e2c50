//! Comment record.

use super::{
    require_text, serialize_iso8601, to_snapshot, CommentId, PostId, Record, Snapshot, UserId,
    ValidationError,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Persisted comment left by one user on one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    #[serde(serialize_with = "serialize_iso8601")]
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    pub post_id: PostId,
}

impl Comment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("content", &self.content)
    }
}

impl Record for Comment {
    const TABLE: &'static str = "comments";

    fn serialize(&self) -> Snapshot {
        to_snapshot(Self::TABLE, self)
    }
}

/// Insert draft for a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub user_id: UserId,
    pub post_id: PostId,
    pub content: String,
}

impl NewComment {
    pub fn new(user_id: UserId, post_id: PostId, content: impl Into<String>) -> Self {
        Self {
            user_id,
            post_id,
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("content", &self.content)
    }
}
