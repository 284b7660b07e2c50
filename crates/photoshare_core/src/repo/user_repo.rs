//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `users`.
//! - Own the cascading account deletion routine.
//!
//! # Invariants
//! - Deleting a user removes their posts, comments and likes, plus every
//!   comment and like attached to those posts, in the same transaction.

use super::{
    count, ensure_connection_ready, parse_created_at, query_all, query_one, CascadeSummary, Page,
    RepoError, RepoResult,
};
use crate::model::user::{NewUser, User};
use crate::model::{Record, UserId};
use log::info;
use rusqlite::{params, Connection, Row};

const USER_COLUMNS: &str = "id, username, email, password, bio, is_active, created_at";

/// Query options for listing users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserListQuery {
    /// Skip accounts with `is_active = false`.
    pub active_only: bool,
    pub page: Page,
}

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Inserts a user and returns the stored row, including `id` and `created_at`.
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Lists users oldest first.
    fn list_users(&self, query: &UserListQuery) -> RepoResult<Vec<User>>;
    /// Writes every mutable column of `user` back to its row.
    fn update_user(&self, user: &User) -> RepoResult<()>;
    /// Deletes the account and everything it owns.
    fn delete_user(&self, id: UserId) -> RepoResult<CascadeSummary>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, User::TABLE)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        user.validate()?;

        let created = query_one(
            self.conn,
            &format!(
                "INSERT INTO users (username, email, password, bio, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {USER_COLUMNS};"
            ),
            params![
                user.username.as_str(),
                user.email.as_str(),
                user.password.as_str(),
                user.bio.as_deref(),
                user.is_active,
            ],
            parse_user_row,
        )?;

        created.ok_or_else(|| RepoError::InvalidData("insert into users returned no row".into()))
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        query_one(
            self.conn,
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1;"),
            [id],
            parse_user_row,
        )
    }

    fn find_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        query_one(
            self.conn,
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1;"),
            [username],
            parse_user_row,
        )
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        query_one(
            self.conn,
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1;"),
            [email],
            parse_user_row,
        )
    }

    fn list_users(&self, query: &UserListQuery) -> RepoResult<Vec<User>> {
        query_all(
            self.conn,
            &format!(
                "SELECT {USER_COLUMNS}
                 FROM users
                 WHERE (?1 = 0 OR is_active = 1)
                 ORDER BY created_at ASC, id ASC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![
                query.active_only,
                query.page.applied_limit(),
                query.page.offset
            ],
            parse_user_row,
        )
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let changed = self.conn.execute(
            "UPDATE users
             SET
                username = ?1,
                email = ?2,
                password = ?3,
                bio = ?4,
                is_active = ?5
             WHERE id = ?6;",
            params![
                user.username.as_str(),
                user.email.as_str(),
                user.password.as_str(),
                user.bio.as_deref(),
                user.is_active,
                user.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: User::TABLE,
                id: user.id.get(),
            });
        }

        Ok(())
    }

    fn delete_user(&self, id: UserId) -> RepoResult<CascadeSummary> {
        let tx = self.conn.unchecked_transaction()?;

        let summary = CascadeSummary {
            posts: count(&tx, "SELECT COUNT(*) FROM posts WHERE user_id = ?1;", [id])?,
            comments: count(
                &tx,
                "SELECT COUNT(*) FROM comments
                 WHERE user_id = ?1
                    OR post_id IN (SELECT id FROM posts WHERE user_id = ?1);",
                [id],
            )?,
            likes: count(
                &tx,
                "SELECT COUNT(*) FROM likes
                 WHERE user_id = ?1
                    OR post_id IN (SELECT id FROM posts WHERE user_id = ?1);",
                [id],
            )?,
        };

        let changed = tx.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: User::TABLE,
                id: id.get(),
            });
        }
        tx.commit()?;

        info!(
            "event=user_delete module=repo status=ok user_id={} posts={} comments={} likes={}",
            id, summary.posts, summary.comments, summary.likes
        );
        Ok(summary)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let is_active = match row.get::<_, i64>("is_active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_active value `{other}` in users.is_active"
            )));
        }
    };

    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        password: row.get("password")?,
        bio: row.get("bio")?,
        is_active,
        created_at: parse_created_at(row, User::TABLE)?,
    })
}
