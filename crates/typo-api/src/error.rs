use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use typo_db::DbError;

use crate::views;

/// Request-level failure. Details are logged; the client only sees a
/// generic page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("session token error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("request failed: {}", self);

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let page = views::error_page(status, "Something went wrong on our side. Please try again.");
        (status, Html(page)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn database_details_are_not_rendered() {
        let err = AppError::Db(DbError::Conflict("UNIQUE constraint failed: users.email".into()));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("users.email"));
        assert!(body.contains("Something went wrong"));
    }
}
