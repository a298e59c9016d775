use axum::{
    Extension,
    extract::{Query, State},
    response::{Html, IntoResponse},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use typo_types::api::{SearchQuery, StatusQuery};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::{AppState, flash, views, with_db};

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user.id;
    let payments = with_db(&state, move |db| db.payments_for_user(user_id)).await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(views::dashboard_page(&user, &flashes, &payments))))
}

/// Substring search over the current user's payment descriptions. An empty
/// query matches every payment. A failed query renders as an empty result
/// with a generic notice.
pub async fn search(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<SearchQuery>,
    jar: CookieJar,
) -> impl IntoResponse {
    let user_id = user.id;
    let needle = params.query.clone();
    let (results, error) =
        match with_db(&state, move |db| db.search_payments(user_id, &needle)).await {
            Ok(rows) => (rows, None),
            Err(e) => {
                warn!(user_id, "Payment search failed: {}", e);
                (Vec::new(), Some("Search is unavailable right now."))
            }
        };

    let (jar, flashes) = flash::take(jar);
    (
        jar,
        Html(views::search_page(&user, &flashes, &params.query, &results, error)),
    )
}

/// Look up one of the current user's payments by id. Ids that do not parse,
/// belong to someone else, or fail to load all read as "not found".
pub async fn status(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<StatusQuery>,
    jar: CookieJar,
) -> impl IntoResponse {
    let payment_id = params.id.trim().to_string();

    let payment = match payment_id.parse::<i64>() {
        Ok(id) => {
            let user_id = user.id;
            with_db(&state, move |db| db.payment_for_user(user_id, id))
                .await
                .unwrap_or_else(|e| {
                    warn!(user_id, payment_id = id, "Payment status lookup failed: {}", e);
                    None
                })
        }
        Err(_) => None,
    };

    let (jar, flashes) = flash::take(jar);
    (
        jar,
        Html(views::status_page(&user, &flashes, &payment_id, payment.as_ref())),
    )
}
