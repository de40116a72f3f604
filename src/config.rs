use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "recipebook".into()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "recipebook-users".into()),
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
            cookie_name: std::env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "session".into()),
            cookie_secure: std::env::var("SESSION_COOKIE_SECURE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        };
        Ok(Self {
            database_url,
            session,
        })
    }
}
