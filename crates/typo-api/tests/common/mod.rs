#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use tower::ServiceExt;

use typo_api::{AppStateInner, session::SessionConfig};
use typo_db::Database;

pub const ALICE: (&str, &str) = ("alice", "password123");
pub const BOB: (&str, &str) = ("bob", "password123");
pub const ADMIN: (&str, &str) = ("admin", "admin123");

/// A seeded in-memory app.
pub fn test_app() -> (Router, Database) {
    let db = Database::open_in_memory().expect("in-memory database");
    db.initialize().expect("seed demo data");

    let state = Arc::new(AppStateInner {
        db: db.clone(),
        session: SessionConfig::new("integration-test-secret"),
    });
    (typo_api::app(state), db)
}

/// Minimal browser: remembers cookies between requests.
#[derive(Default, Clone)]
pub struct Client {
    cookies: HashMap<String, String>,
}

pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub async fn get(&mut self, app: &Router, uri: &str) -> Page {
        let req = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(app, req).await
    }

    pub async fn post(&mut self, app: &Router, uri: &str, fields: &[(&str, &str)]) -> Page {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let req = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(app, req).await
    }

    /// Log in and consume the post-login flash.
    pub async fn login(&mut self, app: &Router, (username, password): (&str, &str)) -> Page {
        let page = self
            .post(app, "/login", &[("username", username), ("password", password)])
            .await;
        if page.status == StatusCode::SEE_OTHER {
            self.get(app, "/dashboard").await
        } else {
            page
        }
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, app: &Router, req: Request<Body>) -> Page {
        let response = app.clone().oneshot(req).await.unwrap();
        self.store_cookies(&response);

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        Page {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    fn store_cookies(&mut self, response: &Response<Body>) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let pair = raw.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let expired = raw.to_ascii_lowercase().contains("max-age=0");
            if value.is_empty() || expired {
                self.cookies.remove(name.trim());
            } else {
                self.cookies.insert(name.trim().to_string(), value.to_string());
            }
        }
    }
}

impl Page {
    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(to));
    }
}
