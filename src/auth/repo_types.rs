use sqlx::FromRow;
use time::OffsetDateTime;

use crate::auth::password::{hash_password, verify_password, PasswordDigest};
use crate::error::ApiError;
use crate::validation::validate_username;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    password_hash: PasswordDigest, // write-only, see `authenticate`
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: OffsetDateTime,
}

impl User {
    pub(crate) fn from_new(id: i64, new: NewUser, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            username: new.username,
            password_hash: new.password_hash,
            image_url: new.image_url,
            bio: new.bio,
            created_at,
        }
    }

    pub fn authenticate(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }
}

/// A validated user that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub(crate) password_hash: PasswordDigest,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl NewUser {
    pub fn new(
        username: Option<&str>,
        password: Option<&str>,
        image_url: Option<String>,
        bio: Option<String>,
    ) -> Result<Self, ApiError> {
        let username = validate_username(username)?.to_owned();
        let password_hash = hash_password(password.unwrap_or_default())?;
        Ok(Self {
            username,
            password_hash,
            image_url,
            bio,
        })
    }
}
