//! User account record.
//!
//! # Invariants
//! - `username` is at most 30 characters, `email` at most 120 and `password`
//!   at most 128; all three are required.
//! - Uniqueness of `username` and `email` is owned by the `users` table.
//! - `password` is stored as supplied and never leaves the crate through
//!   `serialize()` or `Debug`.

use super::{
    limit_chars, require_text, serialize_iso8601, to_snapshot, Record, Snapshot, UserId,
    ValidationError,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{Debug, Formatter};

pub const USERNAME_MAX_CHARS: usize = 30;
pub const EMAIL_MAX_CHARS: usize = 120;
pub const PASSWORD_MAX_CHARS: usize = 128;

/// Persisted user account.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Stored credential. Hashing is the caller's business.
    #[serde(skip_serializing)]
    pub password: String,
    pub bio: Option<String>,
    pub is_active: bool,
    #[serde(serialize_with = "serialize_iso8601")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Checks column limits before an update is written.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_account(&self.username, &self.email, &self.password)
    }
}

impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("bio", &self.bio)
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Record for User {
    const TABLE: &'static str = "users";

    fn serialize(&self) -> Snapshot {
        to_snapshot(Self::TABLE, self)
    }
}

/// Insert draft for a user. The database assigns `id` and `created_at`.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
    pub is_active: bool,
}

impl NewUser {
    /// Creates an active account draft without a bio.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            bio: None,
            is_active: true,
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_account(&self.username, &self.email, &self.password)
    }
}

impl Debug for NewUser {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("bio", &self.bio)
            .field("is_active", &self.is_active)
            .finish()
    }
}

fn validate_account(username: &str, email: &str, password: &str) -> Result<(), ValidationError> {
    require_text("username", username)?;
    limit_chars("username", username, USERNAME_MAX_CHARS)?;
    require_text("email", email)?;
    limit_chars("email", email, EMAIL_MAX_CHARS)?;
    require_text("password", password)?;
    limit_chars("password", password, PASSWORD_MAX_CHARS)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewUser, User, USERNAME_MAX_CHARS};
    use crate::model::{timestamp_from_millis, Record, UserId, ValidationError};

    fn sample_user() -> User {
        User {
            id: UserId(7),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "s3cret".to_string(),
            bio: None,
            is_active: true,
            created_at: timestamp_from_millis(1_700_000_000_000).unwrap(),
        }
    }

    #[test]
    fn serialize_omits_password() {
        let snapshot = sample_user().serialize();
        assert!(!snapshot.contains_key("password"));
        assert_eq!(snapshot["username"], "alice");
        assert_eq!(snapshot["bio"], serde_json::Value::Null);
        assert_eq!(snapshot["created_at"], "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", sample_user());
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn new_user_defaults_to_active_without_bio() {
        let draft = NewUser::new("bob", "bob@example.com", "pw");
        assert!(draft.is_active);
        assert_eq!(draft.bio, None);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn overlong_username_is_rejected() {
        let draft = NewUser::new("x".repeat(USERNAME_MAX_CHARS + 1), "x@example.com", "pw");
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::TooLong {
                field: "username",
                ..
            })
        ));
    }
}
