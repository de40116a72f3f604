use serde::{Deserialize, Serialize};

use crate::auth::repo_types::User;

/// Request body for signup. Every field is optional so that missing input
/// reaches validation instead of failing deserialization.
#[derive(Default, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

/// Request body for login.
#[derive(Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            image_url: u.image_url,
            bio: u.bio,
        }
    }
}
