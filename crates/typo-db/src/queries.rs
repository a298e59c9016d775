use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};
use tracing::info;
use typo_types::models::PaymentStatus;

use crate::models::{AdminStats, FeedbackRow, NewUser, PaymentRow, UserRow};
use crate::{Database, DbError};

const USER_COLUMNS: &str = "id, username, email, password_hash, full_name, is_admin, created_at";
const PAYMENT_COLUMNS: &str = "id, user_id, amount_cents, recipient, description, status, created_at";

impl Database {
    // -- Users --

    /// Insert a user. A taken username or email yields [`DbError::Conflict`].
    pub fn create_user(&self, user: &NewUser<'_>) -> Result<i64, DbError> {
        self.with_conn(|conn| insert_user(conn, user))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    /// All users, newest first.
    pub fn list_users(&self) -> Result<Vec<UserRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Flip the admin flag. Returns the updated user, or `None` if no such user.
    pub fn toggle_admin(&self, id: i64) -> Result<Option<UserRow>, DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let Some(mut user) = query_user_by_id(&tx, id)? else {
                return Ok(None);
            };

            user.is_admin = !user.is_admin;
            tx.execute(
                "UPDATE users SET is_admin = ?1 WHERE id = ?2",
                params![user.is_admin, id],
            )?;
            tx.commit()?;

            info!(user_id = id, is_admin = user.is_admin, "Admin flag toggled");
            Ok(Some(user))
        })
    }

    /// Delete a user together with their payments and feedback. Dependent
    /// rows go first; all three deletes commit together. Returns the deleted
    /// user, or `None` if no such user.
    pub fn delete_user(&self, id: i64) -> Result<Option<UserRow>, DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let Some(user) = query_user_by_id(&tx, id)? else {
                return Ok(None);
            };

            let payments = tx.execute("DELETE FROM payments WHERE user_id = ?1", [id])?;
            let feedback = tx.execute("DELETE FROM feedback WHERE user_id = ?1", [id])?;
            tx.execute("DELETE FROM users WHERE id = ?1", [id])?;
            tx.commit()?;

            info!(user_id = id, payments, feedback, "User and dependent rows deleted");
            Ok(Some(user))
        })
    }

    pub fn admin_stats(&self) -> Result<AdminStats, DbError> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM users WHERE is_admin = 1),
                    (SELECT COUNT(*) FROM payments),
                    (SELECT COUNT(*) FROM feedback)",
                [],
                |row| {
                    Ok(AdminStats {
                        users: row.get(0)?,
                        admins: row.get(1)?,
                        payments: row.get(2)?,
                        feedback: row.get(3)?,
                    })
                },
            )?;
            Ok(stats)
        })
    }

    // -- Payments --

    /// A user's payments, newest first.
    pub fn payments_for_user(&self, user_id: i64) -> Result<Vec<PaymentRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PAYMENT_COLUMNS} FROM payments WHERE user_id = ?1 ORDER BY id DESC"
            ))?;
            let rows = stmt
                .query_map([user_id], payment_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// A user's payments whose description contains `needle`, ignoring ASCII
    /// case. `%` and `_` in the needle match literally.
    pub fn search_payments(&self, user_id: i64, needle: &str) -> Result<Vec<PaymentRow>, DbError> {
        let pattern = format!("%{}%", escape_like(needle));
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PAYMENT_COLUMNS} FROM payments
                 WHERE user_id = ?1 AND description LIKE ?2 ESCAPE '\\'
                 ORDER BY id DESC"
            ))?;
            let rows = stmt
                .query_map(params![user_id, pattern], payment_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// One payment, only if it belongs to `user_id`.
    pub fn payment_for_user(&self, user_id: i64, payment_id: i64) -> Result<Option<PaymentRow>, DbError> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE user_id = ?1 AND id = ?2"),
                    [user_id, payment_id],
                    payment_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Feedback --

    /// Store a feedback message verbatim. Returns the new row id.
    pub fn insert_feedback(&self, user_id: i64, username: &str, message: &str) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO feedback (user_id, username, message) VALUES (?1, ?2, ?3)",
                params![user_id, username, message],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Most recent feedback first.
    pub fn recent_feedback(&self, limit: u32) -> Result<Vec<FeedbackRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, username, message, created_at
                 FROM feedback
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], |row| {
                    Ok(FeedbackRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        username: row.get(2)?,
                        message: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

pub(crate) fn insert_user(conn: &Connection, user: &NewUser<'_>) -> Result<i64, DbError> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash, full_name, is_admin)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.username,
            user.email,
            user.password_hash,
            user.full_name,
            user.is_admin
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>, DbError> {
    let row = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            [username],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>, DbError> {
    let row = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            [id],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        full_name: row.get(4)?,
        is_admin: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn payment_from_row(row: &Row<'_>) -> rusqlite::Result<PaymentRow> {
    let status: String = row.get(5)?;
    let status = status
        .parse::<PaymentStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(PaymentRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount_cents: row.get(2)?,
        recipient: row.get(3)?,
        description: row.get(4)?,
        status,
        created_at: row.get(6)?,
    })
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
