use serde::{Deserialize, Serialize};

use crate::auth::dto::PublicUser;
use crate::recipes::repo_types::RecipeWithOwner;

#[derive(Debug, Default, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub minutes_to_complete: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
    pub user: PublicUser,
}

impl From<RecipeWithOwner> for RecipeResponse {
    fn from(r: RecipeWithOwner) -> Self {
        Self {
            id: r.id,
            title: r.title,
            instructions: r.instructions,
            minutes_to_complete: r.minutes_to_complete,
            user: PublicUser {
                id: r.user_id,
                username: r.owner_username,
                image_url: r.owner_image_url,
                bio: r.owner_bio,
            },
        }
    }
}
