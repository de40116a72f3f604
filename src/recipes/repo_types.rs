use sqlx::FromRow;
use time::OffsetDateTime;

use crate::validation::{validate_instructions, validate_title, ValidationError};

/// A recipe joined with the public columns of its owner.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeWithOwner {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
    pub owner_username: String,
    pub owner_image_url: Option<String>,
    pub owner_bio: Option<String>,
}

/// A validated recipe that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
    pub user_id: i64,
}

impl NewRecipe {
    pub fn new(
        user_id: i64,
        title: Option<&str>,
        instructions: Option<&str>,
        minutes_to_complete: Option<i32>,
    ) -> Result<Self, ValidationError> {
        let title = validate_title(title)?.to_owned();
        let instructions = validate_instructions(instructions)?.to_owned();
        Ok(Self {
            title,
            instructions,
            minutes_to_complete,
            user_id,
        })
    }
}
