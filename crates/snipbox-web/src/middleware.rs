use axum::{
    Extension,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::AppState;
use crate::error::Error;
use crate::session::{AUTH_USER_ID_KEY, PATH_BEFORE_LOGIN_KEY, auth_user_id};

/// Session identity resolved once per request; `None` means anonymous.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Option<i64>);

/// Identity guaranteed by `require_auth`; protected handlers extract this.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i64);

/// Resolve the session-bound user id against the store, dropping ids whose
/// account no longer exists, and expose the result to handlers.
pub async fn load_user(
    State(state): State<AppState>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, Error> {
    let current = match auth_user_id(&session).await? {
        Some(id) => {
            let users = state.users.clone();
            let exists = tokio::task::spawn_blocking(move || users.exists(id))
                .await
                .map_err(Error::join)??;
            if exists {
                CurrentUser(Some(id))
            } else {
                session.remove::<i64>(AUTH_USER_ID_KEY).await?;
                CurrentUser(None)
            }
        }
        None => CurrentUser(None),
    };

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Auth gate for protected routes: anonymous requests are sent to the login
/// page, with the requested path stashed so login can return them to it.
pub async fn require_auth(
    session: Session,
    Extension(current): Extension<CurrentUser>,
    mut req: Request,
    next: Next,
) -> Result<Response, Error> {
    match current.0 {
        Some(id) => {
            req.extensions_mut().insert(AuthUser(id));
            Ok(next.run(req).await)
        }
        None => {
            session
                .insert(PATH_BEFORE_LOGIN_KEY, req.uri().path())
                .await?;
            Ok(Redirect::to("/user/login").into_response())
        }
    }
}

pub async fn secure_headers(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("deny"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    res
}
