//! Demo fixture dataset.
//!
//! Fixture rows carry explicit ids, so seeding an already seeded database
//! trips a UNIQUE/PRIMARY KEY constraint. Each table is inserted as one
//! batch in its own transaction. A uniqueness violation rolls back the whole
//! batch and it is reported as already present; any other failure rolls back
//! and is returned.

use rusqlite::{Connection, Transaction, params};
use tracing::{info, warn};
use typo_types::models::PaymentStatus;
use typo_types::models::PaymentStatus::{Completed, Pending};

use crate::DbError;
use crate::password::hash_password;

pub struct UserFixture {
    pub id: i64,
    pub username: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub full_name: &'static str,
    pub is_admin: bool,
}

pub struct PaymentFixture {
    pub id: i64,
    pub user_id: i64,
    pub amount_cents: i64,
    pub recipient: &'static str,
    pub description: &'static str,
    pub status: PaymentStatus,
}

pub struct FeedbackFixture {
    pub id: i64,
    pub user_id: i64,
    pub username: &'static str,
    pub message: &'static str,
}

pub const USERS: &[UserFixture] = &[
    UserFixture {
        id: 1,
        username: "alice",
        email: "alice@example.com",
        password: "password123",
        full_name: "Alice Johnson",
        is_admin: false,
    },
    UserFixture {
        id: 2,
        username: "bob",
        email: "bob@example.com",
        password: "password123",
        full_name: "Bob Smith",
        is_admin: false,
    },
    UserFixture {
        id: 3,
        username: "admin",
        email: "admin@typo.com",
        password: "admin123",
        full_name: "Admin User",
        is_admin: true,
    },
];

const fn payment(
    id: i64,
    user_id: i64,
    amount_cents: i64,
    recipient: &'static str,
    description: &'static str,
    status: PaymentStatus,
) -> PaymentFixture {
    PaymentFixture {
        id,
        user_id,
        amount_cents,
        recipient,
        description,
        status,
    }
}

pub const PAYMENTS: &[PaymentFixture] = &[
    // alice
    payment(1, 1, 125_000, "Rent Payment - Landlord", "Monthly rent for November", Completed),
    payment(2, 1, 8_999, "Netflix Subscription", "Monthly streaming service", Completed),
    payment(3, 1, 4_567, "Electric Company", "Utility bill payment", Completed),
    payment(4, 1, 2_350, "Coffee Shop Downtown", "Weekly coffee expenses", Completed),
    payment(5, 1, 15_678, "Grocery Store", "Weekly shopping", Completed),
    payment(6, 1, 29_999, "Amazon", "Electronics purchase", Pending),
    payment(7, 1, 7_500, "Gym Membership", "Monthly fitness subscription", Completed),
    payment(8, 1, 1_299, "Spotify Premium", "Music streaming", Completed),
    // bob
    payment(9, 2, 210_000, "Mortgage Payment", "Home loan monthly payment", Completed),
    payment(10, 2, 45_000, "Auto Insurance", "Car insurance premium", Completed),
    payment(11, 2, 6_789, "Gas Station", "Fuel for vehicle", Completed),
    payment(12, 2, 12_345, "Internet Provider", "High-speed internet service", Completed),
    payment(13, 2, 8_900, "Phone Bill", "Mobile service payment", Completed),
    payment(14, 2, 23_456, "Restaurant", "Dinner with clients", Pending),
    payment(15, 2, 1_599, "Apple iCloud", "Cloud storage subscription", Completed),
    payment(16, 2, 19_900, "Home Depot", "Home improvement supplies", Completed),
    // admin
    payment(17, 3, 500_000, "Company Payroll", "Monthly salary distribution", Completed),
    payment(18, 3, 85_000, "AWS Services", "Cloud hosting infrastructure", Completed),
    payment(19, 3, 29_900, "Office Supplies", "Stationery and equipment", Completed),
    payment(20, 3, 120_000, "Marketing Agency", "Digital advertising campaign", Pending),
    payment(21, 3, 45_000, "Software Licenses", "Annual subscription renewal", Completed),
];

pub const FEEDBACK: &[FeedbackFixture] = &[
    FeedbackFixture {
        id: 1,
        user_id: 1,
        username: "alice",
        message: "Love how fast transfers show up on the dashboard!",
    },
    FeedbackFixture {
        id: 2,
        user_id: 2,
        username: "bob",
        message: "Could you add CSV export for payment history?",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Inserted(usize),
    /// A constraint violation abandoned the batch; nothing was written.
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: BatchOutcome,
    pub payments: BatchOutcome,
    pub feedback: BatchOutcome,
}

/// Insert the fixture dataset. The schema must already exist.
pub fn seed(conn: &mut Connection) -> Result<SeedReport, DbError> {
    // Hash up front so the write transaction stays short.
    let hashed = USERS
        .iter()
        .map(|u| hash_password(u.password).map(|hash| (u, hash)))
        .collect::<Result<Vec<_>, _>>()?;

    let users = insert_batch(conn, "users", |tx| {
        for (user, hash) in &hashed {
            tx.execute(
                "INSERT INTO users (id, username, email, password_hash, full_name, is_admin)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![user.id, user.username, user.email, hash, user.full_name, user.is_admin],
            )?;
        }
        Ok(hashed.len())
    })?;

    let payments = insert_batch(conn, "payments", |tx| {
        let mut stmt = tx.prepare(
            "INSERT INTO payments (id, user_id, amount_cents, recipient, description, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for p in PAYMENTS {
            stmt.execute(params![
                p.id,
                p.user_id,
                p.amount_cents,
                p.recipient,
                p.description,
                p.status.as_str()
            ])?;
        }
        Ok(PAYMENTS.len())
    })?;

    let feedback = insert_batch(conn, "feedback", |tx| {
        for f in FEEDBACK {
            tx.execute(
                "INSERT INTO feedback (id, user_id, username, message) VALUES (?1, ?2, ?3, ?4)",
                params![f.id, f.user_id, f.username, f.message],
            )?;
        }
        Ok(FEEDBACK.len())
    })?;

    Ok(SeedReport {
        users,
        payments,
        feedback,
    })
}

fn insert_batch<F>(conn: &mut Connection, table: &'static str, insert: F) -> Result<BatchOutcome, DbError>
where
    F: FnOnce(&Transaction<'_>) -> Result<usize, DbError>,
{
    let tx = conn.transaction()?;
    match insert(&tx) {
        Ok(rows) => {
            tx.commit()?;
            info!(table, rows, "Sample data inserted");
            Ok(BatchOutcome::Inserted(rows))
        }
        Err(DbError::Conflict(detail)) => {
            tx.rollback()?;
            info!(table, %detail, "Sample {} already exist, batch rolled back", table);
            Ok(BatchOutcome::AlreadyPresent)
        }
        Err(e) => {
            tx.rollback()?;
            warn!(table, "Sample data batch failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn fresh_seed_inserts_every_fixture() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let report = seed(&mut conn).unwrap();
        assert_eq!(
            report,
            SeedReport {
                users: BatchOutcome::Inserted(3),
                payments: BatchOutcome::Inserted(21),
                feedback: BatchOutcome::Inserted(2),
            }
        );
    }

    #[test]
    fn seeding_twice_does_not_duplicate() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        seed(&mut conn).unwrap();

        let report = seed(&mut conn).unwrap();
        assert_eq!(report.users, BatchOutcome::AlreadyPresent);
        assert_eq!(report.payments, BatchOutcome::AlreadyPresent);
        assert_eq!(report.feedback, BatchOutcome::AlreadyPresent);

        assert_eq!(count(&conn, "users"), 3);
        assert_eq!(count(&conn, "payments"), 21);
        assert_eq!(count(&conn, "feedback"), 2);
    }

    #[test]
    fn partial_conflict_abandons_whole_batch() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        // Someone registered "bob" before the seed ran.
        conn.execute(
            "INSERT INTO users (username, email, password_hash, full_name) VALUES ('bob', 'b@b', 'h', 'B')",
            [],
        )
        .unwrap();

        let report = seed(&mut conn).unwrap();
        assert_eq!(report.users, BatchOutcome::AlreadyPresent);
        assert_eq!(count(&conn, "users"), 1, "alice must not be inserted on her own");
    }

    #[test]
    fn foreign_key_failure_is_an_error_not_already_present() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        // A non-fixture user holds id 1, so the users batch conflicts and
        // bob (id 2) never exists for his payments to point at.
        conn.execute(
            "INSERT INTO users (username, email, password_hash, full_name) VALUES ('bob', 'b@b', 'h', 'B')",
            [],
        )
        .unwrap();

        let err = seed(&mut conn).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)), "got {err:?}");
        assert_eq!(count(&conn, "payments"), 0);
        assert_eq!(count(&conn, "users"), 1);
    }

    #[test]
    fn fixtures_reference_fixture_users() {
        let ids: Vec<i64> = USERS.iter().map(|u| u.id).collect();
        assert!(PAYMENTS.iter().all(|p| ids.contains(&p.user_id)));
        assert!(FEEDBACK.iter().all(|f| ids.contains(&f.user_id)));
        assert_eq!(USERS.iter().filter(|u| u.is_admin).count(), 1);
    }
}
