use axum::{
    Extension, Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use typo_db::models::NewUser;
use typo_db::password::{check_login, hash_password};
use typo_db::DbError;
use typo_types::api::{LoginForm, RegisterForm};
use typo_types::models::Flash;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::{AppState, flash, session, views, with_db};

pub async fn index(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, Html(views::index_page(&flashes)))
}

pub async fn register_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, Html(views::register_page(&flashes)))
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let username = form.username.clone();
    let result = with_db(&state, move |db| {
        let password_hash = hash_password(&form.password)?;
        db.create_user(&NewUser {
            username: &form.username,
            email: &form.email,
            password_hash: &password_hash,
            full_name: &form.full_name,
            is_admin: false,
        })
    })
    .await;

    match result {
        Ok(user_id) => {
            info!(user_id, %username, "User registered");
            let jar = flash::push(jar, Flash::success("Registration successful! Please login."));
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(AppError::Db(DbError::Conflict(detail))) => {
            info!(%username, %detail, "Registration rejected: duplicate");
            let (jar, mut flashes) = flash::take(jar);
            flashes.push(Flash::error("Username or email already exists"));
            Ok((jar, Html(views::register_page(&flashes))).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn login_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, Html(views::login_page(&flashes)))
}

/// Unknown users and wrong passwords get the same answer, after the same
/// amount of hashing work.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.clone();
    let user = with_db(&state, move |db| {
        let user = db.get_user_by_username(&form.username)?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.as_str());
        let valid = check_login(stored_hash, &form.password);
        Ok(user.filter(|_| valid))
    })
    .await?;

    let Some(user) = user else {
        warn!(%username, "Failed login attempt");
        let (jar, mut flashes) = flash::take(jar);
        flashes.push(Flash::error("Invalid username or password"));
        return Ok((jar, Html(views::login_page(&flashes))).into_response());
    };

    let jar = session::start(jar, &state.session, user.id, &user.username)?;
    let jar = flash::push(jar, Flash::success("Login successful!"));
    info!(user_id = user.id, "User logged in");
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

pub async fn logout(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
) -> impl IntoResponse {
    info!(user_id = user.id, "User logged out");
    let jar = flash::push(session::end(jar), Flash::success("You have been logged out"));
    (jar, Redirect::to("/"))
}

pub async fn profile(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, Html(views::profile_page(&user, &flashes)))
}
