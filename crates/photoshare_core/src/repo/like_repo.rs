//! Like repository contract and SQLite implementation.
//!
//! Likes are insert-or-delete only; there is no update path.

use super::{
    count, ensure_connection_ready, parse_created_at, query_all, query_one, Page, RepoError,
    RepoResult,
};
use crate::model::like::{Like, NewLike};
use crate::model::{LikeId, PostId, Record, UserId};
use rusqlite::{params, Connection, Row};

const LIKE_COLUMNS: &str = "id, created_at, user_id, post_id";

/// Repository interface for likes.
pub trait LikeRepository {
    fn create_like(&self, like: &NewLike) -> RepoResult<Like>;
    fn get_like(&self, id: LikeId) -> RepoResult<Option<Like>>;
    /// Lists a post's likes oldest first.
    fn list_likes_for_post(&self, post_id: PostId, page: Page) -> RepoResult<Vec<Like>>;
    /// Lists likes given by one user, newest first.
    fn list_likes_by_user(&self, user_id: UserId, page: Page) -> RepoResult<Vec<Like>>;
    fn count_likes_for_post(&self, post_id: PostId) -> RepoResult<u64>;
    fn delete_like(&self, id: LikeId) -> RepoResult<()>;
}

/// SQLite-backed like repository.
pub struct SqliteLikeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLikeRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, Like::TABLE)?;
        Ok(Self { conn })
    }
}

impl LikeRepository for SqliteLikeRepository<'_> {
    fn create_like(&self, like: &NewLike) -> RepoResult<Like> {
        let created = query_one(
            self.conn,
            &format!(
                "INSERT INTO likes (user_id, post_id)
                 VALUES (?1, ?2)
                 RETURNING {LIKE_COLUMNS};"
            ),
            params![like.user_id, like.post_id],
            parse_like_row,
        )?;

        created.ok_or_else(|| RepoError::InvalidData("insert into likes returned no row".into()))
    }

    fn get_like(&self, id: LikeId) -> RepoResult<Option<Like>> {
        query_one(
            self.conn,
            &format!("SELECT {LIKE_COLUMNS} FROM likes WHERE id = ?1;"),
            [id],
            parse_like_row,
        )
    }

    fn list_likes_for_post(&self, post_id: PostId, page: Page) -> RepoResult<Vec<Like>> {
        query_all(
            self.conn,
            &format!(
                "SELECT {LIKE_COLUMNS}
                 FROM likes
                 WHERE post_id = ?1
                 ORDER BY created_at ASC, id ASC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![post_id, page.applied_limit(), page.offset],
            parse_like_row,
        )
    }

    fn list_likes_by_user(&self, user_id: UserId, page: Page) -> RepoResult<Vec<Like>> {
        query_all(
            self.conn,
            &format!(
                "SELECT {LIKE_COLUMNS}
                 FROM likes
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![user_id, page.applied_limit(), page.offset],
            parse_like_row,
        )
    }

    fn count_likes_for_post(&self, post_id: PostId) -> RepoResult<u64> {
        count(
            self.conn,
            "SELECT COUNT(*) FROM likes WHERE post_id = ?1;",
            [post_id],
        )
    }

    fn delete_like(&self, id: LikeId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM likes WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Like::TABLE,
                id: id.get(),
            });
        }

        Ok(())
    }
}

fn parse_like_row(row: &Row<'_>) -> RepoResult<Like> {
    Ok(Like {
        id: row.get("id")?,
        created_at: parse_created_at(row, Like::TABLE)?,
        user_id: row.get("user_id")?,
        post_id: row.get("post_id")?,
    })
}
