//! Server-rendered HTML pages.
//!
//! Every value that originates from a user or the database goes through
//! [`escape`] before it is written into markup.

use axum::http::StatusCode;

use typo_db::models::{AdminStats, FeedbackRow, PaymentRow, UserRow};
use typo_types::models::Flash;

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Who the navigation bar is rendered for.
#[derive(Clone, Copy)]
pub enum Viewer<'a> {
    Anonymous,
    Member(&'a UserRow),
}

const STYLE: &str = "
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6fa; color: #222; }
nav { background: #1f2a44; padding: 0.75rem 1.5rem; }
nav a { color: #fff; margin-right: 1rem; text-decoration: none; }
main { max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { padding: 0.5rem; border-bottom: 1px solid #ddd; text-align: left; }
.flash { padding: 0.75rem; margin-bottom: 1rem; border-radius: 4px; }
.flash.success { background: #e3f6e8; }
.flash.error { background: #fbe4e4; }
.status-pending { color: #b7791f; }
.status-completed { color: #2f855a; }
form.inline { display: inline; }
";

fn layout(title: &str, viewer: Viewer<'_>, flashes: &[Flash], body: &str) -> String {
    let mut nav = String::from(r#"<a href="/">Typo Payments</a>"#);
    match viewer {
        Viewer::Anonymous => {
            nav.push_str(r#"<a href="/login">Login</a><a href="/register">Register</a>"#);
        }
        Viewer::Member(user) => {
            nav.push_str(concat!(
                r#"<a href="/dashboard">Dashboard</a>"#,
                r#"<a href="/search">Search</a>"#,
                r#"<a href="/status">Status</a>"#,
                r#"<a href="/feedback">Feedback</a>"#,
                r#"<a href="/profile">Profile</a>"#,
            ));
            if user.is_admin {
                nav.push_str(r#"<a href="/admin">Admin</a>"#);
            }
            nav.push_str(&format!(
                r#"<a href="/logout">Logout ({})</a>"#,
                escape(&user.username)
            ));
        }
    }

    let flashes: String = flashes
        .iter()
        .map(|f| {
            format!(
                r#"<div class="flash {}">{}</div>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Typo Payments</title>
<style>{STYLE}</style>
</head>
<body>
<nav>{nav}</nav>
<main>
{flashes}
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    )
}

pub fn index_page(flashes: &[Flash]) -> String {
    layout(
        "Welcome",
        Viewer::Anonymous,
        flashes,
        r#"<h1>Typo Payments</h1>
<p>Send money, track payments and check transfer status in one place.</p>
<p><a href="/login">Log in</a> or <a href="/register">create an account</a> to get started.</p>"#,
    )
}

pub fn register_page(flashes: &[Flash]) -> String {
    layout(
        "Register",
        Viewer::Anonymous,
        flashes,
        r#"<h1>Create an account</h1>
<form method="post" action="/register">
<p><label>Username <input name="username" required></label></p>
<p><label>Email <input name="email" type="email" required></label></p>
<p><label>Full name <input name="full_name" required></label></p>
<p><label>Password <input name="password" type="password" required></label></p>
<p><button type="submit">Register</button></p>
</form>"#,
    )
}

pub fn login_page(flashes: &[Flash]) -> String {
    layout(
        "Login",
        Viewer::Anonymous,
        flashes,
        r#"<h1>Log in</h1>
<form method="post" action="/login">
<p><label>Username <input name="username" required></label></p>
<p><label>Password <input name="password" type="password" required></label></p>
<p><button type="submit">Log in</button></p>
</form>"#,
    )
}

fn payment_table(payments: &[PaymentRow]) -> String {
    if payments.is_empty() {
        return "<p>No payments found.</p>".to_string();
    }

    let rows: String = payments
        .iter()
        .map(|p| {
            format!(
                r#"<tr><td>{id}</td><td>{recipient}</td><td>{description}</td><td>${amount}</td><td class="status-{status}">{status}</td><td>{created}</td></tr>"#,
                id = p.id,
                recipient = escape(&p.recipient),
                description = escape(p.description.as_deref().unwrap_or("")),
                amount = p.amount(),
                status = p.status.as_str(),
                created = escape(&p.created_at),
            )
        })
        .collect();

    format!(
        "<table><thead><tr><th>ID</th><th>Recipient</th><th>Description</th><th>Amount</th><th>Status</th><th>Date</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

pub fn dashboard_page(user: &UserRow, flashes: &[Flash], payments: &[PaymentRow]) -> String {
    let body = format!(
        "<h1>Welcome back, {name}</h1>\n<h2>Payment history</h2>\n{table}",
        name = escape(&user.full_name),
        table = payment_table(payments),
    );
    layout("Dashboard", Viewer::Member(user), flashes, &body)
}

pub fn search_page(
    user: &UserRow,
    flashes: &[Flash],
    query: &str,
    results: &[PaymentRow],
    error: Option<&str>,
) -> String {
    let mut body = format!(
        r#"<h1>Search payments</h1>
<form method="get" action="/search">
<input name="query" value="{query}" placeholder="Description contains...">
<button type="submit">Search</button>
</form>"#,
        query = escape(query),
    );

    if let Some(error) = error {
        body.push_str(&format!(r#"<div class="flash error">{}</div>"#, escape(error)));
    }
    if query.is_empty() {
        body.push_str(&format!("<h2>All payments ({})</h2>", results.len()));
    } else {
        body.push_str(&format!(
            "<h2>{} result(s) for &ldquo;{}&rdquo;</h2>",
            results.len(),
            escape(query)
        ));
    }
    body.push_str(&payment_table(results));

    layout("Search", Viewer::Member(user), flashes, &body)
}

pub fn status_page(
    user: &UserRow,
    flashes: &[Flash],
    payment_id: &str,
    payment: Option<&PaymentRow>,
) -> String {
    let mut body = format!(
        r#"<h1>Payment status</h1>
<form method="get" action="/status">
<input name="id" value="{id}" placeholder="Payment ID">
<button type="submit">Check</button>
</form>"#,
        id = escape(payment_id),
    );

    match (payment_id.is_empty(), payment) {
        (true, _) => {}
        (false, Some(p)) => body.push_str(&format!(
            r#"<h2>Payment #{id}</h2>
<dl>
<dt>Recipient</dt><dd>{recipient}</dd>
<dt>Description</dt><dd>{description}</dd>
<dt>Amount</dt><dd>${amount}</dd>
<dt>Status</dt><dd class="status-{status}">{status}</dd>
<dt>Created</dt><dd>{created}</dd>
</dl>"#,
            id = p.id,
            recipient = escape(&p.recipient),
            description = escape(p.description.as_deref().unwrap_or("")),
            amount = p.amount(),
            status = p.status.as_str(),
            created = escape(&p.created_at),
        )),
        (false, None) => body.push_str(
            "<h2>Payment Not Found</h2>\n<p>No payment with that ID exists on your account.</p>",
        ),
    }

    layout("Status", Viewer::Member(user), flashes, &body)
}

pub fn feedback_page(user: &UserRow, flashes: &[Flash], feedback: &[FeedbackRow]) -> String {
    let entries: String = if feedback.is_empty() {
        "<p>No feedback yet. Be the first!</p>".to_string()
    } else {
        feedback
            .iter()
            .map(|f| {
                format!(
                    "<article><strong>{}</strong> <small>{}</small><p>{}</p></article>",
                    escape(&f.username),
                    escape(&f.created_at),
                    escape(&f.message)
                )
            })
            .collect()
    };

    let body = format!(
        r#"<h1>Feedback</h1>
<form method="post" action="/feedback">
<p><textarea name="message" rows="4" cols="60" required></textarea></p>
<p><button type="submit">Send feedback</button></p>
</form>
<h2>Recent feedback</h2>
{entries}"#
    );
    layout("Feedback", Viewer::Member(user), flashes, &body)
}

pub fn profile_page(user: &UserRow, flashes: &[Flash]) -> String {
    let body = format!(
        r#"<h1>Your profile</h1>
<dl>
<dt>Username</dt><dd>{username}</dd>
<dt>Email</dt><dd>{email}</dd>
<dt>Full name</dt><dd>{full_name}</dd>
<dt>Role</dt><dd>{role}</dd>
<dt>Member since</dt><dd>{created}</dd>
</dl>"#,
        username = escape(&user.username),
        email = escape(&user.email),
        full_name = escape(&user.full_name),
        role = if user.is_admin { "Administrator" } else { "User" },
        created = escape(&user.created_at),
    );
    layout("Profile", Viewer::Member(user), flashes, &body)
}

fn user_table(viewer: &UserRow, users: &[UserRow]) -> String {
    let rows: String = users
        .iter()
        .map(|u| {
            let actions = if u.id == viewer.id {
                "<em>you</em>".to_string()
            } else {
                format!(
                    r#"<form class="inline" method="post" action="/admin/toggle-admin/{id}"><button type="submit">{toggle}</button></form>
<form class="inline" method="post" action="/admin/delete-user/{id}"><button type="submit">Delete</button></form>"#,
                    id = u.id,
                    toggle = if u.is_admin { "Revoke admin" } else { "Make admin" },
                )
            };
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                u.id,
                escape(&u.username),
                escape(&u.email),
                escape(&u.full_name),
                if u.is_admin { "yes" } else { "no" },
                escape(&u.created_at),
                actions
            )
        })
        .collect();

    format!(
        "<table><thead><tr><th>ID</th><th>Username</th><th>Email</th><th>Full name</th><th>Admin</th><th>Created</th><th></th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

pub fn admin_dashboard_page(
    viewer: &UserRow,
    flashes: &[Flash],
    users: &[UserRow],
    stats: &AdminStats,
) -> String {
    let body = format!(
        r#"<h1>Admin dashboard</h1>
<ul>
<li>Users: {users_count}</li>
<li>Admins: {admins}</li>
<li>Payments: {payments}</li>
<li>Feedback entries: {feedback}</li>
</ul>
<p><a href="/admin/users">Manage users</a> | <a href="/admin/create-user">Create user</a></p>
<form method="post" action="/admin/reset-database" onsubmit="return confirm('Reset the whole database?');">
<button type="submit">Reset database</button>
</form>
<h2>Users</h2>
{table}"#,
        users_count = stats.users,
        admins = stats.admins,
        payments = stats.payments,
        feedback = stats.feedback,
        table = user_table(viewer, users),
    );
    layout("Admin", Viewer::Member(viewer), flashes, &body)
}

pub fn admin_users_page(viewer: &UserRow, flashes: &[Flash], users: &[UserRow]) -> String {
    let body = format!(
        r#"<h1>Manage users</h1>
<p><a href="/admin/create-user">Create user</a></p>
{}"#,
        user_table(viewer, users)
    );
    layout("Users", Viewer::Member(viewer), flashes, &body)
}

pub fn admin_create_user_page(viewer: &UserRow, flashes: &[Flash]) -> String {
    layout(
        "Create user",
        Viewer::Member(viewer),
        flashes,
        r#"<h1>Create user</h1>
<form method="post" action="/admin/create-user">
<p><label>Username <input name="username" required></label></p>
<p><label>Email <input name="email" type="email" required></label></p>
<p><label>Full name <input name="full_name" required></label></p>
<p><label>Password <input name="password" type="password" required></label></p>
<p><label><input name="is_admin" type="checkbox" value="on"> Administrator</label></p>
<p><button type="submit">Create</button></p>
</form>"#,
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{} {}</h1>\n<p>{}</p>",
        status.as_u16(),
        escape(title),
        escape(message)
    );
    layout(title, Viewer::Anonymous, &[], &body)
}
