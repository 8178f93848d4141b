use axum::{
    Extension,
    extract::{Form, Path, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::AppState;
use crate::error::Error;
use crate::forms::SnippetCreateForm;
use crate::middleware::CurrentUser;
use crate::render::{self, PageData};
use crate::{csrf, session};

pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let store = state.snippets.clone();
    let snippets = tokio::task::spawn_blocking(move || store.latest())
        .await
        .map_err(Error::join)??;

    let page = PageData::gather(&session, current).await?;
    Ok(Html(render::home(&page, &snippets)).into_response())
}

pub async fn view(
    State(state): State<AppState>,
    session: Session,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response, Error> {
    // Non-numeric and sub-1 ids are a 404, not a client error.
    let id: i64 = id.parse().map_err(|_| Error::NotFound)?;
    if id < 1 {
        return Err(Error::NotFound);
    }

    let store = state.snippets.clone();
    let snippet = tokio::task::spawn_blocking(move || store.get(id))
        .await
        .map_err(Error::join)??;

    let page = PageData::gather(&session, current).await?;
    Ok(Html(render::snippet_view(&page, &snippet)).into_response())
}

pub async fn create_form(
    session: Session,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let page = PageData::gather(&session, current).await?;
    let form = SnippetCreateForm {
        expires: 365,
        ..Default::default()
    };
    Ok(Html(render::snippet_create(&page, &form)).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Extension(current): Extension<CurrentUser>,
    form: Result<Form<SnippetCreateForm>, FormRejection>,
) -> Result<Response, Error> {
    let Form(mut form) = form.map_err(|_| Error::BadRequest)?;
    csrf::verify(&session, &form.csrf_token).await?;

    if !form.validate() {
        let page = PageData::gather(&session, current).await?;
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render::snippet_create(&page, &form)),
        )
            .into_response());
    }

    let store = state.snippets.clone();
    let (title, content, expires) = (form.title.clone(), form.content.clone(), form.expires);
    let id = tokio::task::spawn_blocking(move || store.insert(&title, &content, expires))
        .await
        .map_err(Error::join)??;

    session::set_flash(&session, "Snippet succesfully created!").await?;
    Ok(Redirect::to(&format!("/snippet/view/{}", id)).into_response())
}
