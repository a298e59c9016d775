use axum::{
    Extension, Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use typo_types::api::FeedbackForm;
use typo_types::models::Flash;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::{AppState, flash, views, with_db};

/// How many entries the board shows.
pub const FEEDBACK_LIMIT: u32 = 50;

pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let feedback = with_db(&state, |db| db.recent_feedback(FEEDBACK_LIMIT)).await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(views::feedback_page(&user, &flashes, &feedback))))
}

/// Stores the message exactly as typed; escaping happens at render time.
pub async fn submit(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
    Form(form): Form<FeedbackForm>,
) -> Result<Response, AppError> {
    if form.message.trim().is_empty() {
        let jar = flash::push(jar, Flash::error("Feedback cannot be empty"));
        return Ok((jar, Redirect::to("/feedback")).into_response());
    }

    let user_id = user.id;
    let username = user.username.clone();
    let feedback_id = with_db(&state, move |db| {
        db.insert_feedback(user_id, &username, &form.message)
    })
    .await?;

    info!(user_id, feedback_id, "Feedback stored");
    let jar = flash::push(jar, Flash::success("Thank you for your feedback!"));
    Ok((jar, Redirect::to("/feedback")).into_response())
}
