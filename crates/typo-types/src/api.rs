use serde::{Deserialize, Serialize};

// -- Session Claims --

/// Claims carried by the session cookie. `sub` is the user's row id; the
/// user record itself is reloaded on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// -- Payments --

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

/// `id` stays a string: anything that is not a payment id is simply "not found".
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub id: String,
}

// -- Feedback --

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    pub message: String,
}

// -- Admin --

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// HTML checkboxes are only submitted when ticked.
    #[serde(default)]
    pub is_admin: Option<String>,
}

impl CreateUserForm {
    pub fn wants_admin(&self) -> bool {
        self.is_admin.is_some()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
