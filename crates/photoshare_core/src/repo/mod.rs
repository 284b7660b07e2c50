//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes call the model's `validate()` before SQL mutations.
//! - Constraint violations reported by SQLite are returned unchanged as
//!   `RepoError::Db`; they are never retried or swallowed.
//! - Repositories refuse connections that do not enforce foreign keys.

pub mod comment_repo;
pub mod like_repo;
pub mod post_repo;
pub mod user_repo;

use crate::db::{foreign_keys_enabled, table_exists, DbError};
use crate::model::{timestamp_from_millis, ValidationError};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const LIST_DEFAULT_LIMIT: u32 = 20;
const LIST_LIMIT_MAX: u32 = 100;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all entity repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound { entity: &'static str, id: i64 },
    InvalidData(String),
    MissingRequiredTable(&'static str),
    ForeignKeysDisabled,
}

impl RepoError {
    /// Returns whether SQLite rejected the write on a schema constraint,
    /// e.g. a duplicate username or a dangling `user_id`.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_constraint_violation())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::ForeignKeysDisabled => write!(f, "connection does not enforce foreign keys"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Pagination window shared by list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// Maximum rows to return. Defaults to 20 and clamps to 100.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }

    /// Effective limit after defaulting and clamping.
    pub fn applied_limit(&self) -> u32 {
        match self.limit {
            Some(0) | None => LIST_DEFAULT_LIMIT,
            Some(limit) => limit.min(LIST_LIMIT_MAX),
        }
    }
}

/// Rows removed by a cascading delete, not counting the owning row itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub posts: u64,
    pub comments: u64,
    pub likes: u64,
}

pub(crate) fn ensure_connection_ready(conn: &Connection, table: &'static str) -> RepoResult<()> {
    if !foreign_keys_enabled(conn)? {
        return Err(RepoError::ForeignKeysDisabled);
    }
    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }
    Ok(())
}

pub(crate) fn query_one<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(parse(row)?)),
        None => Ok(None),
    }
}

pub(crate) fn query_all<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

pub(crate) fn count(conn: &Connection, sql: &str, params: impl Params) -> RepoResult<u64> {
    let value: i64 = conn.query_row(sql, params, |row| row.get(0))?;
    u64::try_from(value).map_err(|_| RepoError::InvalidData(format!("negative count `{value}`")))
}

pub(crate) fn parse_created_at(row: &Row<'_>, table: &str) -> RepoResult<DateTime<Utc>> {
    let millis: i64 = row.get("created_at")?;
    timestamp_from_millis(millis).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid created_at value `{millis}` in {table}.created_at"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn page_limit_defaults_and_clamps() {
        assert_eq!(Page::default().applied_limit(), 20);
        assert_eq!(Page::new(0, 0).applied_limit(), 20);
        assert_eq!(Page::new(5, 0).applied_limit(), 5);
        assert_eq!(Page::new(500, 0).applied_limit(), 100);
    }
}
