use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use std::sync::LazyLock;

use rand_core::OsRng;
use tracing::warn;

use crate::DbError;

/// Hash a password with Argon2id and a fresh salt. Returns a PHC string.
pub fn hash_password(password: &str) -> Result<String, DbError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Password(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string. A malformed stored hash
/// never matches.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Unparseable password hash in users table: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Verified against when a login names no existing user.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("typo-dummy-password").unwrap_or_else(|e| {
        warn!("Could not build dummy login hash: {}", e);
        String::new()
    })
});

/// Check a login attempt. `stored_hash` is `None` when the username is
/// unknown; the password is still run through Argon2 against a dummy hash
/// and the result is always `false`.
pub fn check_login(stored_hash: Option<&str>, password: &str) -> bool {
    let candidate = stored_hash.unwrap_or(DUMMY_HASH.as_str());
    let matched = verify_password(candidate, password);
    matched && stored_hash.is_some()
}

/// Build the dummy hash ahead of the first login.
pub fn warm_up() {
    LazyLock::force(&DUMMY_HASH);
}
