pub mod account;
pub mod csrf;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod render;
pub mod session;
pub mod snippets;
pub mod users;
pub mod validator;

#[cfg(test)]
pub(crate) mod testutil;

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::time::Duration};

use snipbox_types::{SnippetStore, UserStore};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub snippets: Arc<dyn SnippetStore>,
    pub users: Arc<dyn UserStore>,
}

/// Builds the whole application: routes, auth gate, session layer, security
/// headers, panic recovery, and request tracing. Tests drive this router
/// directly; the binary serves it.
pub fn app_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::hours(12)));

    let public = Router::new()
        .route("/", get(snippets::home))
        .route("/snippet/view/{id}", get(snippets::view))
        .route("/user/signup", get(users::signup_form).post(users::signup))
        .route("/user/login", get(users::login_form).post(users::login))
        .route("/ping", get(ping));

    let protected = Router::new()
        .route(
            "/snippet/create",
            get(snippets::create_form).post(snippets::create),
        )
        .route("/user/logout", post(users::logout))
        .route("/account/view", get(account::view))
        .route(
            "/account/password/update",
            get(account::password_form).post(account::password_update),
        )
        .route_layer(from_fn(middleware::require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(from_fn_with_state(state.clone(), middleware::load_user))
        .layer(session_layer)
        .layer(from_fn(middleware::secure_headers))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping() -> &'static str {
    "OK"
}
