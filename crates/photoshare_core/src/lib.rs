//! Core data layer for the photoshare application.
//! Owns the users/posts/comments/likes schema, its cascade rules and the
//! snapshot form each record is exposed as.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::comment::{Comment, NewComment};
pub use model::like::{Like, NewLike};
pub use model::post::{NewPost, Post};
pub use model::user::{NewUser, User};
pub use model::{CommentId, LikeId, PostId, Record, Snapshot, UserId, ValidationError};
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::like_repo::{LikeRepository, SqliteLikeRepository};
pub use repo::post_repo::{PostListQuery, PostRepository, SqlitePostRepository};
pub use repo::user_repo::{SqliteUserRepository, UserListQuery, UserRepository};
pub use repo::{CascadeSummary, Page, RepoError, RepoResult};
pub use service::photo_service::{
    PhotoService, PostDetail, ServiceError, ServiceResult, SqlitePhotoService,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
