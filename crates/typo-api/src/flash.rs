//! One-shot flash messages carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use tracing::warn;

use typo_types::models::Flash;

pub const FLASH_COOKIE: &str = "typo_flash";

/// Queue a message for the next rendered page.
pub fn push(jar: CookieJar, flash: Flash) -> CookieJar {
    let mut pending = peek(&jar);
    pending.push(flash);

    let encoded = match serde_json::to_vec(&pending) {
        Ok(json) => B64.encode(json),
        Err(e) => {
            warn!("Dropping flash message: {}", e);
            return jar;
        }
    };

    jar.add(
        Cookie::build((FLASH_COOKIE, encoded))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Drain queued messages, clearing the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Flash>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }
    let pending = peek(&jar);
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), pending)
}

fn peek(jar: &CookieJar) -> Vec<Flash> {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return Vec::new();
    };

    B64.decode(cookie.value())
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}
