//! Photo-sharing domain model.
//!
//! # Responsibility
//! - Define the four persisted record types and their insert drafts.
//! - Project loaded records into flat, transmission-safe snapshots.
//!
//! # Invariants
//! - Loaded records always carry a database-assigned id and `created_at`.
//! - Snapshots render timestamps as RFC 3339 UTC strings and foreign keys as
//!   raw integers.
//! - A user snapshot never contains the stored password.

pub mod comment;
pub mod like;
pub mod post;
pub mod user;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use log::error;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Flat field-name to value mapping produced by [`Record::serialize`].
pub type Snapshot = Map<String, Value>;

/// Behavior shared by every persisted record type.
pub trait Record {
    /// Backing table name.
    const TABLE: &'static str;

    /// Projects the record into a transmission-ready snapshot.
    fn serialize(&self) -> Snapshot;
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw integer key.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                self.0.to_sql()
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }
    };
}

record_id!(
    /// Surrogate key of a row in `users`.
    UserId
);
record_id!(
    /// Surrogate key of a row in `posts`.
    PostId
);
record_id!(
    /// Surrogate key of a row in `comments`.
    CommentId
);
record_id!(
    /// Surrogate key of a row in `likes`.
    LikeId
);

/// Field-level validation failure raised before any write reaches SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text is empty or whitespace only.
    Empty { field: &'static str },
    /// Text exceeds the column limit, counted in characters.
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is {actual} characters; at most {max} allowed")
            }
        }
    }
}

impl Error for ValidationError {}

/// Renders a creation timestamp the way snapshots expose it.
///
/// Example: `2026-10-19T08:15:02.417Z`.
pub fn to_iso8601(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts a stored epoch-millisecond value into a UTC timestamp.
pub fn timestamp_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Characters stripped before a required text column is checked for
/// emptiness. Mirrors `trim(x, ' ' || char(9, 10, 11, 12, 13))` in the schema.
pub const BLANK_CHARS: [char; 6] = [' ', '\t', '\n', '\u{0B}', '\u{0C}', '\r'];

/// Returns whether `value` is empty once [`BLANK_CHARS`] are trimmed.
pub fn is_blank(value: &str) -> bool {
    value.trim_matches(BLANK_CHARS.as_slice()).is_empty()
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

pub(crate) fn limit_chars(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

pub(crate) fn serialize_iso8601<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_iso8601(timestamp))
}

pub(crate) fn to_snapshot<T: Serialize>(table: &str, record: &T) -> Snapshot {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            error!(
                "event=serialize module=model status=error table={table} error_code=not_an_object"
            );
            Snapshot::new()
        }
        Err(err) => {
            error!("event=serialize module=model status=error table={table} error={err}");
            Snapshot::new()
        }
    }
}
