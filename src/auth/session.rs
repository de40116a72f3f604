use std::convert::Infallible;
use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{config::SessionConfig, error::ApiError, state::AppState};

/// Payload of the session cookie. The user id is the whole session.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
    pub aud: String,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
    cookie_name: String,
    cookie_secure: bool,
}

impl SessionKeys {
    pub fn new(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64) * 60),
            cookie_name: cfg.cookie_name.clone(),
            cookie_secure: cfg.cookie_secure,
        }
    }

    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "session token signed");
        Ok(token)
    }

    /// Checks signature, issuer, audience and expiry, then yields the user id.
    pub fn verify(&self, token: &str) -> anyhow::Result<i64> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        let user_id = data.claims.sub.parse::<i64>()?;
        debug!(user_id, "session token verified");
        Ok(user_id)
    }

    /// Reads the session carried by the request. Anything that does not
    /// verify is an anonymous session.
    pub fn load(&self, jar: &CookieJar) -> Session {
        let Some(cookie) = jar.get(&self.cookie_name) else {
            return Session::anonymous();
        };
        match self.verify(cookie.value()) {
            Ok(user_id) => Session {
                user_id: Some(user_id),
                changed: false,
            },
            Err(e) => {
                warn!(error = %e, "rejected session cookie");
                Session::anonymous()
            }
        }
    }

    /// Writes the session back to the cookie jar if a service call changed it.
    pub fn persist(&self, session: &Session, jar: CookieJar) -> Result<CookieJar, ApiError> {
        if !session.changed {
            return Ok(jar);
        }
        match session.user_id {
            Some(user_id) => {
                let token = self.sign(user_id)?;
                let cookie = Cookie::build((self.cookie_name.clone(), token))
                    .http_only(true)
                    .secure(self.cookie_secure)
                    .same_site(SameSite::Lax)
                    .path("/")
                    .max_age(TimeDuration::seconds(self.ttl.as_secs() as i64));
                Ok(jar.add(cookie))
            }
            None => Ok(jar.remove(Cookie::build(self.cookie_name.clone()).path("/"))),
        }
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        SessionKeys::new(&state.config.session)
    }
}

/// Per-request session state: `Anonymous` or `Authenticated(user_id)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<i64>,
    changed: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn establish(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
        self.changed = true;
    }

    pub fn check(&self) -> Option<i64> {
        self.user_id
    }

    pub fn clear(&mut self) {
        if self.user_id.take().is_some() {
            self.changed = true;
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(keys.load(&jar))
    }
}
