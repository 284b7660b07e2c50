//! Post repository contract and SQLite implementation.
//!
//! # Invariants
//! - A post can only be created for an existing author (`FOREIGN KEY`).
//! - Deleting a post removes its comments and likes in the same transaction.
//! - Listing order is `created_at DESC, id DESC`.

use super::{
    count, ensure_connection_ready, parse_created_at, query_all, query_one, CascadeSummary, Page,
    RepoError, RepoResult,
};
use crate::model::post::{NewPost, Post};
use crate::model::{PostId, Record, UserId};
use log::info;
use rusqlite::{params, Connection, Row};

const POST_COLUMNS: &str = "id, image_url, caption, created_at, user_id";

/// Query options for listing posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostListQuery {
    /// Restrict to posts by one author.
    pub author: Option<UserId>,
    pub page: Page,
}

/// Repository interface for posts.
pub trait PostRepository {
    fn create_post(&self, post: &NewPost) -> RepoResult<Post>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    /// Lists posts newest first.
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    /// Writes `image_url` and `caption` back to the row.
    fn update_post(&self, post: &Post) -> RepoResult<()>;
    /// Deletes the post with its comments and likes.
    fn delete_post(&self, id: PostId) -> RepoResult<CascadeSummary>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, Post::TABLE)?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, post: &NewPost) -> RepoResult<Post> {
        post.validate()?;

        let created = query_one(
            self.conn,
            &format!(
                "INSERT INTO posts (image_url, caption, user_id)
                 VALUES (?1, ?2, ?3)
                 RETURNING {POST_COLUMNS};"
            ),
            params![post.image_url.as_str(), post.caption.as_deref(), post.user_id],
            parse_post_row,
        )?;

        created.ok_or_else(|| RepoError::InvalidData("insert into posts returned no row".into()))
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        query_one(
            self.conn,
            &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1;"),
            [id],
            parse_post_row,
        )
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        query_all(
            self.conn,
            &format!(
                "SELECT {POST_COLUMNS}
                 FROM posts
                 WHERE (?1 IS NULL OR user_id = ?1)
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![
                query.author,
                query.page.applied_limit(),
                query.page.offset
            ],
            parse_post_row,
        )
    }

    fn update_post(&self, post: &Post) -> RepoResult<()> {
        post.validate()?;

        let changed = self.conn.execute(
            "UPDATE posts SET image_url = ?1, caption = ?2 WHERE id = ?3;",
            params![post.image_url.as_str(), post.caption.as_deref(), post.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Post::TABLE,
                id: post.id.get(),
            });
        }

        Ok(())
    }

    fn delete_post(&self, id: PostId) -> RepoResult<CascadeSummary> {
        let tx = self.conn.unchecked_transaction()?;

        let summary = CascadeSummary {
            posts: 0,
            comments: count(&tx, "SELECT COUNT(*) FROM comments WHERE post_id = ?1;", [id])?,
            likes: count(&tx, "SELECT COUNT(*) FROM likes WHERE post_id = ?1;", [id])?,
        };

        let changed = tx.execute("DELETE FROM posts WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Post::TABLE,
                id: id.get(),
            });
        }
        tx.commit()?;

        info!(
            "event=post_delete module=repo status=ok post_id={} comments={} likes={}",
            id, summary.comments, summary.likes
        );
        Ok(summary)
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let post = Post {
        id: row.get("id")?,
        image_url: row.get("image_url")?,
        caption: row.get("caption")?,
        created_at: parse_created_at(row, Post::TABLE)?,
        user_id: row.get("user_id")?,
    };
    post.validate()?;
    Ok(post)
}
