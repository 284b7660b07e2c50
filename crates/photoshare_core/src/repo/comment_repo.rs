//! Comment repository contract and SQLite implementation.

use super::{
    count, ensure_connection_ready, parse_created_at, query_all, query_one, Page, RepoError,
    RepoResult,
};
use crate::model::comment::{Comment, NewComment};
use crate::model::{CommentId, PostId, Record, UserId};
use rusqlite::{params, Connection, Row};

const COMMENT_COLUMNS: &str = "id, content, created_at, user_id, post_id";

/// Repository interface for comments.
pub trait CommentRepository {
    fn create_comment(&self, comment: &NewComment) -> RepoResult<Comment>;
    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>>;
    /// Lists a post's comments oldest first.
    fn list_comments_for_post(&self, post_id: PostId, page: Page) -> RepoResult<Vec<Comment>>;
    /// Lists comments written by one user, newest first.
    fn list_comments_by_user(&self, user_id: UserId, page: Page) -> RepoResult<Vec<Comment>>;
    fn count_comments_for_post(&self, post_id: PostId) -> RepoResult<u64>;
    /// Writes `content` back to the row.
    fn update_comment(&self, comment: &Comment) -> RepoResult<()>;
    fn delete_comment(&self, id: CommentId) -> RepoResult<()>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, Comment::TABLE)?;
        Ok(Self { conn })
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn create_comment(&self, comment: &NewComment) -> RepoResult<Comment> {
        comment.validate()?;

        let created = query_one(
            self.conn,
            &format!(
                "INSERT INTO comments (content, user_id, post_id)
                 VALUES (?1, ?2, ?3)
                 RETURNING {COMMENT_COLUMNS};"
            ),
            params![comment.content.as_str(), comment.user_id, comment.post_id],
            parse_comment_row,
        )?;

        created
            .ok_or_else(|| RepoError::InvalidData("insert into comments returned no row".into()))
    }

    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        query_one(
            self.conn,
            &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1;"),
            [id],
            parse_comment_row,
        )
    }

    fn list_comments_for_post(&self, post_id: PostId, page: Page) -> RepoResult<Vec<Comment>> {
        query_all(
            self.conn,
            &format!(
                "SELECT {COMMENT_COLUMNS}
                 FROM comments
                 WHERE post_id = ?1
                 ORDER BY created_at ASC, id ASC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![post_id, page.applied_limit(), page.offset],
            parse_comment_row,
        )
    }

    fn list_comments_by_user(&self, user_id: UserId, page: Page) -> RepoResult<Vec<Comment>> {
        query_all(
            self.conn,
            &format!(
                "SELECT {COMMENT_COLUMNS}
                 FROM comments
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![user_id, page.applied_limit(), page.offset],
            parse_comment_row,
        )
    }

    fn count_comments_for_post(&self, post_id: PostId) -> RepoResult<u64> {
        count(
            self.conn,
            "SELECT COUNT(*) FROM comments WHERE post_id = ?1;",
            [post_id],
        )
    }

    fn update_comment(&self, comment: &Comment) -> RepoResult<()> {
        comment.validate()?;

        let changed = self.conn.execute(
            "UPDATE comments SET content = ?1 WHERE id = ?2;",
            params![comment.content.as_str(), comment.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Comment::TABLE,
                id: comment.id.get(),
            });
        }

        Ok(())
    }

    fn delete_comment(&self, id: CommentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Comment::TABLE,
                id: id.get(),
            });
        }

        Ok(())
    }
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    let comment = Comment {
        id: row.get("id")?,
        content: row.get("content")?,
        created_at: parse_created_at(row, Comment::TABLE)?,
        user_id: row.get("user_id")?,
        post_id: row.get("post_id")?,
    };
    comment.validate()?;
    Ok(comment)
}
