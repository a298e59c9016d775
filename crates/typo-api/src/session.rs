//! Session identity cookie.
//!
//! The cookie holds an HS256 token whose `sub` is the user id. The token is
//! only a reference; guards reload the user row on every request.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use typo_types::api::Claims;

pub const SESSION_COOKIE: &str = "typo_session";

const SESSION_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    /// Mark cookies `Secure`. Only enable behind HTTPS.
    pub secure_cookies: bool,
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            secure_cookies: false,
        }
    }
}

pub fn create_token(config: &SessionConfig, user_id: i64, username: &str) -> jsonwebtoken::errors::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

pub fn decode_token(config: &SessionConfig, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| debug!("Rejected session token: {}", e))
    .ok()
}

/// The user id referenced by the request's session cookie, if any.
pub fn user_id(jar: &CookieJar, config: &SessionConfig) -> Option<i64> {
    let cookie = jar.get(SESSION_COOKIE)?;
    decode_token(config, cookie.value()).map(|claims| claims.sub)
}

/// Attach a fresh session for `user_id` to the jar.
pub fn start(
    jar: CookieJar,
    config: &SessionConfig,
    user_id: i64,
    username: &str,
) -> jsonwebtoken::errors::Result<CookieJar> {
    let token = create_token(config, user_id, username)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies);
    Ok(jar.add(cookie))
}

pub fn end(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
