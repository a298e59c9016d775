//! Admin panel handlers. All routes here sit behind `require_admin`.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, warn};

use typo_db::DbError;
use typo_db::models::NewUser;
use typo_db::password::hash_password;
use typo_types::api::CreateUserForm;
use typo_types::models::Flash;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::{AppState, flash, session, views, with_db};

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (users, stats) = with_db(&state, |db| Ok((db.list_users()?, db.admin_stats()?))).await?;

    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        Html(views::admin_dashboard_page(&admin, &flashes, &users, &stats)),
    ))
}

pub async fn users(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let users = with_db(&state, |db| db.list_users()).await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(views::admin_users_page(&admin, &flashes, &users))))
}

pub async fn create_user_form(
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, Html(views::admin_create_user_page(&admin, &flashes)))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    jar: CookieJar,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, AppError> {
    let username = form.username.clone();
    let is_admin = form.wants_admin();
    let result = with_db(&state, move |db| {
        let password_hash = hash_password(&form.password)?;
        db.create_user(&NewUser {
            username: &form.username,
            email: &form.email,
            password_hash: &password_hash,
            full_name: &form.full_name,
            is_admin,
        })
    })
    .await;

    match result {
        Ok(user_id) => {
            info!(admin_id = admin.id, user_id, is_admin, "Admin created user");
            let jar = flash::push(
                jar,
                Flash::success(format!("User {} created successfully!", username)),
            );
            Ok((jar, Redirect::to("/admin/users")).into_response())
        }
        Err(AppError::Db(DbError::Conflict(_))) => {
            let (jar, mut flashes) = flash::take(jar);
            flashes.push(Flash::error("Username or email already exists"));
            Ok((jar, Html(views::admin_create_user_page(&admin, &flashes))).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn toggle_admin(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let message = if user_id == admin.id {
        Flash::error("You cannot modify your own admin status")
    } else {
        match with_db(&state, move |db| db.toggle_admin(user_id)).await? {
            Some(user) => {
                info!(admin_id = admin.id, user_id, is_admin = user.is_admin, "Admin status changed");
                let change = if user.is_admin { "granted to" } else { "revoked from" };
                Flash::success(format!("Admin privileges {} {}", change, user.username))
            }
            None => Flash::error("User not found"),
        }
    };

    let jar = flash::push(jar, message);
    Ok((jar, Redirect::to("/admin/users")).into_response())
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let message = if user_id == admin.id {
        Flash::error("You cannot delete your own account")
    } else {
        match with_db(&state, move |db| db.delete_user(user_id)).await? {
            Some(user) => {
                warn!(admin_id = admin.id, user_id, username = %user.username, "User deleted");
                Flash::success(format!(
                    "User {} and their data deleted successfully",
                    user.username
                ))
            }
            None => Flash::error("User not found"),
        }
    };

    let jar = flash::push(jar, message);
    Ok((jar, Redirect::to("/admin/users")).into_response())
}

/// Wipe and reseed the database, then log the admin out: their session may
/// no longer point at the same account.
pub async fn reset_database(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    jar: CookieJar,
) -> Response {
    warn!(admin_id = admin.id, "Database reset requested from admin panel");

    match with_db(&state, |db| db.reset()).await {
        Ok(report) => {
            info!(?report, "Database reset from admin panel");
            let jar = flash::push(
                session::end(jar),
                Flash::success("Database has been reset to initial state. Please log in again."),
            );
            (jar, Redirect::to("/login")).into_response()
        }
        Err(e) => {
            error!("Database reset failed: {}", e);
            let jar = flash::push(
                jar,
                Flash::error("Failed to reset database. Check logs for details."),
            );
            (jar, Redirect::to("/admin")).into_response()
        }
    }
}
