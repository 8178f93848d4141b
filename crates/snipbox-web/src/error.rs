use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use snipbox_types::ModelError;
use tracing::error;

use crate::render;

/// Web-layer failure taxonomy. Anything unexpected funnels into `Internal`,
/// which is logged in full while the client sees only a generic page.
#[derive(Debug)]
pub enum Error {
    NotFound,
    BadRequest,
    Internal(anyhow::Error),
}

impl Error {
    pub(crate) fn join(e: tokio::task::JoinError) -> Self {
        error!("spawn_blocking join error: {}", e);
        Error::Internal(e.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => {
                (StatusCode::NOT_FOUND, Html(render::error_page("Not Found"))).into_response()
            }
            Error::BadRequest => {
                (StatusCode::BAD_REQUEST, Html(render::error_page("Bad Request"))).into_response()
            }
            Error::Internal(err) => {
                error!("internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(render::error_page("Internal Server Error")),
                )
                    .into_response()
            }
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err)
    }
}

impl From<tower_sessions::session::Error> for Error {
    fn from(err: tower_sessions::session::Error) -> Self {
        Error::Internal(err.into())
    }
}

/// Default mapping for model failures handlers do not match explicitly:
/// a missing record is a 404, everything else is a server error.
impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NoRecord => Error::NotFound,
            other => Error::Internal(other.into()),
        }
    }
}
