//! Photo-sharing use-case service.
//!
//! # Responsibility
//! - Provide one entry point for account, post, comment and like use-cases.
//! - Assemble read models such as [`PostDetail`] from several repositories.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Constraint violations from storage are passed through unchanged inside
//!   `ServiceError::Repo`.

use crate::model::comment::{Comment, NewComment};
use crate::model::like::{Like, NewLike};
use crate::model::post::{NewPost, Post};
use crate::model::user::{NewUser, User};
use crate::model::{CommentId, LikeId, PostId, Record, Snapshot, UserId};
use crate::repo::comment_repo::{CommentRepository, SqliteCommentRepository};
use crate::repo::like_repo::{LikeRepository, SqliteLikeRepository};
use crate::repo::post_repo::{PostListQuery, PostRepository, SqlitePostRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::{CascadeSummary, Page, RepoError, RepoResult};
use rusqlite::Connection;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for photo-sharing use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target record does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// See [`RepoError::is_constraint_violation`].
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Repo(err) if err.is_constraint_violation())
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Post together with its comments and like count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub post: Post,
    /// Comments oldest first, limited by the requested page.
    pub comments: Vec<Comment>,
    pub like_count: u64,
}

impl PostDetail {
    /// Post snapshot extended with `comments` (array of comment snapshots)
    /// and `like_count`.
    pub fn serialize(&self) -> Snapshot {
        let mut snapshot = self.post.serialize();
        snapshot.insert(
            "comments".to_string(),
            Value::Array(
                self.comments
                    .iter()
                    .map(|comment| Value::Object(comment.serialize()))
                    .collect(),
            ),
        );
        snapshot.insert("like_count".to_string(), Value::from(self.like_count));
        snapshot
    }
}

/// Use-case facade over the four entity repositories.
pub struct PhotoService<U, P, C, L> {
    users: U,
    posts: P,
    comments: C,
    likes: L,
}

/// Service wired to SQLite repositories sharing one connection.
pub type SqlitePhotoService<'conn> = PhotoService<
    SqliteUserRepository<'conn>,
    SqlitePostRepository<'conn>,
    SqliteCommentRepository<'conn>,
    SqliteLikeRepository<'conn>,
>;

impl<'conn> SqlitePhotoService<'conn> {
    /// Builds the service on a migrated connection.
    pub fn try_from_connection(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteUserRepository::try_new(conn)?,
            SqlitePostRepository::try_new(conn)?,
            SqliteCommentRepository::try_new(conn)?,
            SqliteLikeRepository::try_new(conn)?,
        ))
    }
}

impl<U, P, C, L> PhotoService<U, P, C, L>
where
    U: UserRepository,
    P: PostRepository,
    C: CommentRepository,
    L: LikeRepository,
{
    /// Creates a service using the provided repository implementations.
    pub fn new(users: U, posts: P, comments: C, likes: L) -> Self {
        Self {
            users,
            posts,
            comments,
            likes,
        }
    }

    /// Creates an account. Duplicate username or email fails with a
    /// constraint violation.
    pub fn register_user(&self, user: &NewUser) -> ServiceResult<User> {
        Ok(self.users.create_user(user)?)
    }

    pub fn get_user(&self, id: UserId) -> ServiceResult<User> {
        self.users.get_user(id)?.ok_or(ServiceError::NotFound {
            entity: User::TABLE,
            id: id.get(),
        })
    }

    pub fn update_user(&self, user: &User) -> ServiceResult<()> {
        Ok(self.users.update_user(user)?)
    }

    /// Deletes an account with all of its posts, comments and likes.
    pub fn delete_user(&self, id: UserId) -> ServiceResult<CascadeSummary> {
        Ok(self.users.delete_user(id)?)
    }

    /// Publishes a post for an existing author.
    pub fn publish_post(&self, post: &NewPost) -> ServiceResult<Post> {
        Ok(self.posts.create_post(post)?)
    }

    pub fn get_post(&self, id: PostId) -> ServiceResult<Post> {
        self.posts.get_post(id)?.ok_or(ServiceError::NotFound {
            entity: Post::TABLE,
            id: id.get(),
        })
    }

    /// Lists posts by one author, newest first.
    pub fn posts_by(&self, author: UserId, page: Page) -> ServiceResult<Vec<Post>> {
        Ok(self.posts.list_posts(&PostListQuery {
            author: Some(author),
            page,
        })?)
    }

    /// Lists posts from every author, newest first.
    pub fn recent_posts(&self, page: Page) -> ServiceResult<Vec<Post>> {
        Ok(self.posts.list_posts(&PostListQuery { author: None, page })?)
    }

    pub fn update_post(&self, post: &Post) -> ServiceResult<()> {
        Ok(self.posts.update_post(post)?)
    }

    /// Deletes a post with its comments and likes.
    pub fn delete_post(&self, id: PostId) -> ServiceResult<CascadeSummary> {
        Ok(self.posts.delete_post(id)?)
    }

    pub fn comment_on_post(&self, comment: &NewComment) -> ServiceResult<Comment> {
        Ok(self.comments.create_comment(comment)?)
    }

    pub fn update_comment(&self, comment: &Comment) -> ServiceResult<()> {
        Ok(self.comments.update_comment(comment)?)
    }

    pub fn delete_comment(&self, id: CommentId) -> ServiceResult<()> {
        Ok(self.comments.delete_comment(id)?)
    }

    /// Records a like. Repeated likes by the same user are stored as
    /// separate rows.
    pub fn like_post(&self, user_id: UserId, post_id: PostId) -> ServiceResult<Like> {
        Ok(self.likes.create_like(&NewLike::new(user_id, post_id))?)
    }

    pub fn unlike(&self, id: LikeId) -> ServiceResult<()> {
        Ok(self.likes.delete_like(id)?)
    }

    /// Lists comments written by one user on any post, newest first.
    pub fn comments_by(&self, user_id: UserId, page: Page) -> ServiceResult<Vec<Comment>> {
        Ok(self.comments.list_comments_by_user(user_id, page)?)
    }

    /// Lists likes given by one user, newest first.
    pub fn likes_by(&self, user_id: UserId, page: Page) -> ServiceResult<Vec<Like>> {
        Ok(self.likes.list_likes_by_user(user_id, page)?)
    }

    /// Loads a post with one page of comments and its total like count.
    pub fn post_detail(&self, id: PostId, comments_page: Page) -> ServiceResult<PostDetail> {
        let post = self.get_post(id)?;
        let comments = self.comments.list_comments_for_post(id, comments_page)?;
        let like_count = self.likes.count_likes_for_post(id)?;

        Ok(PostDetail {
            post,
            comments,
            like_count,
        })
    }
}
