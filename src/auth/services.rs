use tracing::{info, warn};

use crate::auth::dto::{LoginRequest, SignupRequest};
use crate::auth::repo_types::{NewUser, User};
use crate::auth::session::Session;
use crate::error::{ApiError, ApiResult};
use crate::store::Store;

/// Creates the account and logs it in. Nothing is written and the session is
/// left alone if any step fails.
pub async fn signup(store: &dyn Store, session: &mut Session, req: SignupRequest) -> ApiResult<User> {
    let new = NewUser::new(
        req.username.as_deref(),
        req.password.as_deref(),
        req.image_url,
        req.bio,
    )?;
    let user = store.insert_user(new).await?;
    session.establish(user.id);
    info!(user_id = user.id, username = %user.username, "user signed up");
    Ok(user)
}

pub async fn login(store: &dyn Store, session: &mut Session, req: LoginRequest) -> ApiResult<User> {
    let Some(username) = req.username.as_deref() else {
        warn!("login without username");
        return Err(ApiError::Unauthorized);
    };
    let password = req.password.as_deref().unwrap_or_default();

    let Some(user) = store.find_user_by_username(username).await? else {
        warn!(%username, "login unknown username");
        return Err(ApiError::Unauthorized);
    };
    if password.is_empty() || !user.authenticate(password) {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::Unauthorized);
    }

    session.establish(user.id);
    info!(user_id = user.id, "user logged in");
    Ok(user)
}

/// The signed-in user, if the session points at one that still exists.
pub async fn check_session(store: &dyn Store, session: &Session) -> ApiResult<User> {
    let user_id = session.check().ok_or(ApiError::Unauthorized)?;
    store.find_user(user_id).await?.ok_or_else(|| {
        warn!(user_id, "session refers to a missing user");
        ApiError::Unauthorized
    })
}

pub fn logout(session: &mut Session) -> ApiResult<()> {
    let user_id = session.check().ok_or(ApiError::Unauthorized)?;
    session.clear();
    info!(user_id, "user logged out");
    Ok(())
}

/// Deletes the signed-in user and all of its recipes, then clears the session.
pub async fn delete_account(store: &dyn Store, session: &mut Session) -> ApiResult<()> {
    let user_id = session.check().ok_or(ApiError::Unauthorized)?;
    if !store.delete_user(user_id).await? {
        return Err(ApiError::Unauthorized);
    }
    session.clear();
    info!(user_id, "account deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::repo_types::NewRecipe;
    use crate::store::MemoryStore;

    fn signup_req(username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }

    fn login_req(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn signup_creates_user_and_establishes_session() {
        let store = MemoryStore::default();
        let mut session = Session::anonymous();

        let user = signup(&store, &mut session, signup_req("amy", "pw123")).await.unwrap();
        assert_eq!(user.username, "amy");
        assert!(user.authenticate("pw123"));
        assert_eq!(session.check(), Some(user.id));

        let current = check_session(&store, &session).await.unwrap();
        assert_eq!(current.id, user.id);
    }

    #[tokio::test]
    async fn signup_without_password_writes_nothing() {
        let store = MemoryStore::default();
        let mut session = Session::anonymous();

        for password in [None, Some(String::new())] {
            let req = SignupRequest {
                username: Some("amy".into()),
                password,
                ..Default::default()
            };
            let err = signup(&store, &mut session, req).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }
        assert_eq!(store.user_count().await, 0);
        assert_eq!(session.check(), None);
    }

    #[tokio::test]
    async fn signup_without_username_is_rejected() {
        let store = MemoryStore::default();
        let mut session = Session::anonymous();
        let err = signup(&store, &mut session, signup_req("", "pw123")).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_validation_error() {
        let store = MemoryStore::default();
        let mut first = Session::anonymous();
        let mut second = Session::anonymous();

        signup(&store, &mut first, signup_req("amy", "pw123")).await.unwrap();
        let err = signup(&store, &mut second, signup_req("amy", "other")).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(second.check(), None);
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_duplicate_signups_have_one_winner() {
        let store = MemoryStore::default();
        let mut a = Session::anonymous();
        let mut b = Session::anonymous();

        let (ra, rb) = tokio::join!(
            signup(&store, &mut a, signup_req("amy", "pw-a")),
            signup(&store, &mut b, signup_req("amy", "pw-b")),
        );

        assert_eq!(ra.is_ok() as u8 + rb.is_ok() as u8, 1);
        let loser = if ra.is_ok() { rb } else { ra };
        assert!(matches!(loser, Err(ApiError::Validation(_))));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn login_with_correct_credentials_binds_the_session() {
        let store = MemoryStore::default();
        let created = signup(&store, &mut Session::anonymous(), signup_req("amy", "pw123"))
            .await
            .unwrap();

        let mut session = Session::anonymous();
        let user = login(&store, &mut session, login_req("amy", "pw123")).await.unwrap();
        assert_eq!(user.id, created.id);
        assert_eq!(check_session(&store, &session).await.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn login_failures_never_establish_a_session() {
        let store = MemoryStore::default();
        signup(&store, &mut Session::anonymous(), signup_req("amy", "pw123"))
            .await
            .unwrap();

        let cases = [
            login_req("amy", "wrong"),
            login_req("amy", ""),
            login_req("nobody", "pw123"),
            LoginRequest::default(),
        ];
        for req in cases {
            let mut session = Session::anonymous();
            let err = login(&store, &mut session, req).await.unwrap_err();
            assert!(matches!(err, ApiError::Unauthorized));
            assert_eq!(session.check(), None);
        }
    }

    #[tokio::test]
    async fn logout_then_check_session_is_unauthorized() {
        let store = MemoryStore::default();
        let mut session = Session::anonymous();
        signup(&store, &mut session, signup_req("amy", "pw123")).await.unwrap();

        logout(&mut session).unwrap();
        let err = check_session(&store, &session).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));

        assert!(matches!(logout(&mut session), Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn deleted_account_loses_its_session_and_recipes() {
        let store = MemoryStore::default();
        let mut session = Session::anonymous();
        let user = signup(&store, &mut session, signup_req("amy", "pw123")).await.unwrap();
        let instructions = "Whisk the eggs, fold in the flour, then bake for twenty minutes.";
        let recipe = NewRecipe::new(user.id, Some("Cake"), Some(instructions), None).unwrap();
        store.insert_recipe(recipe).await.unwrap();

        // a copy of the cookie taken before the account goes away
        let stale = session.clone();
        delete_account(&store, &mut session).await.unwrap();

        assert_eq!(store.recipe_count().await, 0);
        assert!(matches!(
            check_session(&store, &stale).await,
            Err(ApiError::Unauthorized)
        ));
    }
}
