//! Photo post record.
//!
//! # Invariants
//! - `image_url` is required and at most 255 characters.
//! - `user_id` references the author; the author's deletion removes the post.

use super::{
    limit_chars, require_text, serialize_iso8601, to_snapshot, PostId, Record, Snapshot, UserId,
    ValidationError,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const IMAGE_URL_MAX_CHARS: usize = 255;

/// Persisted photo post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub image_url: String,
    pub caption: Option<String>,
    #[serde(serialize_with = "serialize_iso8601")]
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
}

impl Post {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_image_url(&self.image_url)
    }
}

impl Record for Post {
    const TABLE: &'static str = "posts";

    fn serialize(&self) -> Snapshot {
        to_snapshot(Self::TABLE, self)
    }
}

/// Insert draft for a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub user_id: UserId,
    pub image_url: String,
    pub caption: Option<String>,
}

impl NewPost {
    pub fn new(user_id: UserId, image_url: impl Into<String>) -> Self {
        Self {
            user_id,
            image_url: image_url.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_image_url(&self.image_url)
    }
}

fn validate_image_url(image_url: &str) -> Result<(), ValidationError> {
    require_text("image_url", image_url)?;
    limit_chars("image_url", image_url, IMAGE_URL_MAX_CHARS)
}

#[cfg(test)]
mod tests {
    use super::{NewPost, Post};
    use crate::model::{timestamp_from_millis, PostId, Record, UserId, ValidationError};

    #[test]
    fn serialize_exposes_author_as_raw_id() {
        let post = Post {
            id: PostId(3),
            image_url: "img.png".to_string(),
            caption: Some("sunset".to_string()),
            created_at: timestamp_from_millis(0).unwrap(),
            user_id: UserId(11),
        };

        let snapshot = post.serialize();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot["user_id"], 11);
        assert_eq!(snapshot["caption"], "sunset");
        assert_eq!(snapshot["created_at"], "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn blank_image_url_is_rejected() {
        let draft = NewPost::new(UserId(1), "   ");
        assert_eq!(
            draft.validate(),
            Err(ValidationError::Empty { field: "image_url" })
        );
    }
}
