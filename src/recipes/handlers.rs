use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::session::Session,
    error::ApiResult,
    recipes::{
        dto::{CreateRecipeRequest, RecipeResponse},
        services,
    },
    state::AppState,
};

pub fn recipe_routes() -> Router<AppState> {
    Router::new().route("/recipes", get(list_recipes).post(create_recipe))
}

#[instrument(skip(state, session))]
pub async fn list_recipes(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let recipes = services::list_recipes(state.store.as_ref(), &session).await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

#[instrument(skip_all)]
pub async fn create_recipe(
    State(state): State<AppState>,
    session: Session,
    payload: Option<Json<CreateRecipeRequest>>,
) -> ApiResult<(StatusCode, Json<RecipeResponse>)> {
    let Json(payload) = payload.unwrap_or_default();
    let recipe = services::create_recipe(state.store.as_ref(), &session, payload).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}
