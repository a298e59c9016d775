use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use typo_db::models::UserRow;
use typo_types::models::Flash;

use crate::{AppState, flash, session, with_db};

/// The authenticated user, resolved from the session cookie for this request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRow);

/// Resolve the session cookie to a user row. Anything short of an existing
/// user sends the client to `/login`.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(user_id) = session::user_id(&jar, &state.session) else {
        return login_redirect(jar);
    };

    let user = match with_db(&state, move |db| db.get_user_by_id(user_id)).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!(user_id, "Session references a user that no longer exists");
            return login_redirect(session::end(jar));
        }
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}

/// Must run inside [`require_auth`].
pub async fn require_admin(jar: CookieJar, req: Request, next: Next) -> Response {
    let Some(CurrentUser(user)) = req.extensions().get::<CurrentUser>() else {
        return login_redirect(jar);
    };

    if !user.is_admin {
        debug!(user_id = user.id, "Non-admin refused from admin route");
        let jar = flash::push(
            jar,
            Flash::error("You need administrator privileges to access this page."),
        );
        return (jar, Redirect::to("/dashboard")).into_response();
    }

    next.run(req).await
}

fn login_redirect(jar: CookieJar) -> Response {
    let jar = flash::push(jar, Flash::error("Please log in to access this page."));
    (jar, Redirect::to("/login")).into_response()
}
