//! Handler-test plumbing: in-memory store doubles and a minimal client that
//! drives the full router while carrying session cookies between requests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use snipbox_types::{ModelError, Snippet, SnippetStore, User, UserStore};

use crate::{AppState, AppStateInner, app_router};

fn mock_snippet() -> Snippet {
    Snippet {
        id: 1,
        title: "An old silent pond".into(),
        content: "An old silent pond...\nA frog jumps into the pond,\nsplash! Silence again."
            .into(),
        created: Utc::now(),
        expires: Utc::now() + Duration::days(365),
    }
}

pub struct MockSnippetStore;

impl SnippetStore for MockSnippetStore {
    fn insert(&self, _title: &str, _content: &str, _expires_days: i64) -> Result<i64, ModelError> {
        Ok(2)
    }

    fn get(&self, id: i64) -> Result<Snippet, ModelError> {
        if id == 1 {
            Ok(mock_snippet())
        } else {
            Err(ModelError::NoRecord)
        }
    }

    fn latest(&self) -> Result<Vec<Snippet>, ModelError> {
        Ok(vec![mock_snippet()])
    }
}

pub struct MockUserStore;

impl UserStore for MockUserStore {
    fn insert(&self, _name: &str, email: &str, _password: &str) -> Result<(), ModelError> {
        match email {
            "dupe@example.com" => Err(ModelError::DuplicateEmail),
            _ => Ok(()),
        }
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<i64, ModelError> {
        if email == "alice@example.com" && password == "pa$$word" {
            Ok(1)
        } else {
            Err(ModelError::InvalidCredentials)
        }
    }

    fn exists(&self, id: i64) -> Result<bool, ModelError> {
        Ok(id == 1)
    }

    fn get(&self, id: i64) -> Result<User, ModelError> {
        if id == 1 {
            Ok(User {
                id: 1,
                name: "Alice".into(),
                email: "alice@example.com".into(),
                created: Utc::now(),
            })
        } else {
            Err(ModelError::NoRecord)
        }
    }

    fn password_update(
        &self,
        id: i64,
        current_password: &str,
        _new_password: &str,
    ) -> Result<(), ModelError> {
        if id != 1 {
            return Err(ModelError::NoRecord);
        }
        if current_password != "pa$$word" {
            return Err(ModelError::InvalidCredentials);
        }
        Ok(())
    }
}

pub fn test_app() -> TestApp {
    let state: AppState = Arc::new(AppStateInner {
        snippets: Arc::new(MockSnippetStore),
        users: Arc::new(MockUserStore),
    });
    TestApp {
        router: app_router(state),
        cookies: Vec::new(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub struct TestApp {
    router: Router,
    cookies: Vec<String>,
}

impl TestApp {
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let req = self
            .with_cookies(Request::get(path))
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let req = self
            .with_cookies(Request::post(path))
            .header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Body::from(body))
            .unwrap();
        self.send(req).await
    }

    fn with_cookies(&self, mut builder: axum::http::request::Builder) -> axum::http::request::Builder {
        if !self.cookies.is_empty() {
            builder = builder.header(header::COOKIE, self.cookies.join("; "));
        }
        builder
    }

    async fn send(&mut self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();

        for value in res.headers().get_all(header::SET_COOKIE) {
            if let Ok(s) = value.to_str() {
                let pair = s.split(';').next().unwrap_or("").to_string();
                if let Some(name) = pair.split('=').next() {
                    let prefix = format!("{}=", name);
                    self.cookies.retain(|c| !c.starts_with(&prefix));
                }
                self.cookies.push(pair);
            }
        }

        let status = res.status();
        let headers = res.headers().clone();
        let body = res.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        }
    }
}

/// Logs in as the canned mock user and asserts the redirect.
pub async fn login(app: &mut TestApp) {
    let res = app.get("/user/login").await;
    assert_eq!(res.status, StatusCode::OK);
    let token = extract_csrf_token(&res.body);

    let res = app
        .post_form(
            "/user/login",
            &[
                ("email", "alice@example.com"),
                ("password", "pa$$word"),
                ("csrf_token", &token),
            ],
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
}

/// Pulls the hidden CSRF input out of a rendered form.
pub fn extract_csrf_token(body: &str) -> String {
    let marker = "name='csrf_token' value='";
    let start = body
        .find(marker)
        .map(|i| i + marker.len())
        .expect("no csrf token in body");
    let rest = &body[start..];
    let end = rest.find('\'').expect("unterminated csrf token");
    rest[..end].to_string()
}

/// Just enough application/x-www-form-urlencoded encoding for test input.
fn form_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            ' ' => out.push('+'),
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '+' => out.push_str("%2B"),
            '=' => out.push_str("%3D"),
            '\n' => out.push_str("%0A"),
            _ => out.push(c),
        }
    }
    out
}
