use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, SignupRequest},
        services,
        session::{Session, SessionKeys},
    },
    error::ApiResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", delete(logout))
        .route("/account", delete(delete_account))
}

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/check_session", get(check_session))
}

#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    mut session: Session,
    payload: Option<Json<SignupRequest>>,
) -> ApiResult<(StatusCode, CookieJar, Json<PublicUser>)> {
    let Json(payload) = payload.unwrap_or_default();
    let user = services::signup(state.store.as_ref(), &mut session, payload).await?;
    let jar = SessionKeys::from_ref(&state).persist(&session, jar)?;
    Ok((StatusCode::CREATED, jar, Json(user.into())))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut session: Session,
    payload: Option<Json<LoginRequest>>,
) -> ApiResult<(CookieJar, Json<PublicUser>)> {
    let Json(payload) = payload.unwrap_or_default();
    let user = services::login(state.store.as_ref(), &mut session, payload).await?;
    let jar = SessionKeys::from_ref(&state).persist(&session, jar)?;
    Ok((jar, Json(user.into())))
}

#[instrument(skip(state, session))]
pub async fn check_session(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<PublicUser>> {
    let user = services::check_session(state.store.as_ref(), &session).await?;
    Ok(Json(user.into()))
}

#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    mut session: Session,
) -> ApiResult<(StatusCode, CookieJar)> {
    services::logout(&mut session)?;
    let jar = SessionKeys::from_ref(&state).persist(&session, jar)?;
    Ok((StatusCode::NO_CONTENT, jar))
}

#[instrument(skip_all)]
pub async fn delete_account(
    State(state): State<AppState>,
    jar: CookieJar,
    mut session: Session,
) -> ApiResult<(StatusCode, CookieJar)> {
    services::delete_account(state.store.as_ref(), &mut session).await?;
    let jar = SessionKeys::from_ref(&state).persist(&session, jar)?;
    Ok((StatusCode::NO_CONTENT, jar))
}
