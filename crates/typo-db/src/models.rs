//! Database row types. These map directly to SQLite rows.

use typo_types::models::PaymentStatus;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub is_admin: bool,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct PaymentRow {
    pub id: i64,
    pub user_id: i64,
    pub amount_cents: i64,
    pub recipient: String,
    pub description: Option<String>,
    pub status: PaymentStatus,
    pub created_at: String,
}

impl PaymentRow {
    /// Amount with two decimals, e.g. `1250.00`.
    pub fn amount(&self) -> String {
        format_cents(self.amount_cents)
    }
}

#[derive(Debug, Clone)]
pub struct FeedbackRow {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub message: String,
    pub created_at: String,
}

/// Insert payload for a user; the password is already hashed.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub is_admin: bool,
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminStats {
    pub users: i64,
    pub admins: i64,
    pub payments: i64,
    pub feedback: i64,
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
