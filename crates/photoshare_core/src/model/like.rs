//! Like record.
//!
//! A like carries no payload beyond its two owners. The same user may like
//! the same post more than once; the schema does not forbid it.

use super::{serialize_iso8601, to_snapshot, LikeId, PostId, Record, Snapshot, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Persisted like of one post by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Like {
    pub id: LikeId,
    #[serde(serialize_with = "serialize_iso8601")]
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    pub post_id: PostId,
}

impl Record for Like {
    const TABLE: &'static str = "likes";

    fn serialize(&self) -> Snapshot {
        to_snapshot(Self::TABLE, self)
    }
}

/// Insert draft for a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewLike {
    pub user_id: UserId,
    pub post_id: PostId,
}

impl NewLike {
    pub fn new(user_id: UserId, post_id: PostId) -> Self {
        Self { user_id, post_id }
    }
}
