use axum::{
    Extension,
    extract::{Form, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use snipbox_types::ModelError;
use tower_sessions::Session;

use crate::AppState;
use crate::error::Error;
use crate::forms::PasswordUpdateForm;
use crate::middleware::{AuthUser, CurrentUser};
use crate::render::{self, PageData};
use crate::session::AUTH_USER_ID_KEY;
use crate::{csrf, session};

pub async fn view(
    State(state): State<AppState>,
    session: Session,
    Extension(current): Extension<CurrentUser>,
    Extension(AuthUser(id)): Extension<AuthUser>,
) -> Result<Response, Error> {
    let store = state.users.clone();
    let result = tokio::task::spawn_blocking(move || store.get(id))
        .await
        .map_err(Error::join)?;

    match result {
        Ok(user) => {
            let page = PageData::gather(&session, current).await?;
            Ok(Html(render::account(&page, &user)).into_response())
        }
        // The account vanished between the auth gate and here; drop the
        // stale identity instead of serving a 404.
        Err(ModelError::NoRecord) => {
            session.remove::<i64>(AUTH_USER_ID_KEY).await?;
            Ok(Redirect::to("/user/login").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn password_form(
    session: Session,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let page = PageData::gather(&session, current).await?;
    Ok(Html(render::password_update(&page, &PasswordUpdateForm::default())).into_response())
}

pub async fn password_update(
    State(state): State<AppState>,
    session: Session,
    Extension(current): Extension<CurrentUser>,
    Extension(AuthUser(id)): Extension<AuthUser>,
    form: Result<Form<PasswordUpdateForm>, FormRejection>,
) -> Result<Response, Error> {
    let Form(mut form) = form.map_err(|_| Error::BadRequest)?;
    csrf::verify(&session, &form.csrf_token).await?;

    if !form.validate() {
        let page = PageData::gather(&session, current).await?;
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render::password_update(&page, &form)),
        )
            .into_response());
    }

    let store = state.users.clone();
    let (current_password, new_password) = (
        form.current_password.clone(),
        form.new_password.clone(),
    );
    let result =
        tokio::task::spawn_blocking(move || store.password_update(id, &current_password, &new_password))
            .await
            .map_err(Error::join)?;

    match result {
        Ok(()) => {
            session::set_flash(&session, "Your password has been updated!").await?;
            Ok(Redirect::to("/account/view").into_response())
        }
        Err(ModelError::InvalidCredentials) => {
            form.validator
                .add_field_error("current_password", "Current password is incorrect");
            let page = PageData::gather(&session, current).await?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render::password_update(&page, &form)),
            )
                .into_response())
        }
        Err(ModelError::NoRecord) => {
            session.remove::<i64>(AUTH_USER_ID_KEY).await?;
            Ok(Redirect::to("/user/login").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
