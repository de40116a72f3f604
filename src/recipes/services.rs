use tracing::info;

use crate::auth::session::Session;
use crate::error::{ApiError, ApiResult};
use crate::recipes::dto::CreateRecipeRequest;
use crate::recipes::repo_types::{NewRecipe, RecipeWithOwner};
use crate::store::Store;

pub async fn list_recipes(store: &dyn Store, session: &Session) -> ApiResult<Vec<RecipeWithOwner>> {
    session.check().ok_or(ApiError::Unauthorized)?;
    Ok(store.list_recipes().await?)
}

/// Validates and stores a recipe owned by the signed-in user.
pub async fn create_recipe(
    store: &dyn Store,
    session: &Session,
    req: CreateRecipeRequest,
) -> ApiResult<RecipeWithOwner> {
    let user_id = session.check().ok_or(ApiError::Unauthorized)?;
    let new = NewRecipe::new(
        user_id,
        req.title.as_deref(),
        req.instructions.as_deref(),
        req.minutes_to_complete,
    )?;
    let recipe = store.insert_recipe(new).await?;
    info!(recipe_id = recipe.id, user_id, "recipe created");
    Ok(recipe)
}
