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
use crate::forms::{LogoutForm, UserLoginForm, UserSignupForm};
use crate::middleware::CurrentUser;
use crate::render::{self, PageData};
use crate::{csrf, session};

pub async fn signup_form(
    session: Session,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let page = PageData::gather(&session, current).await?;
    Ok(Html(render::signup(&page, &UserSignupForm::default())).into_response())
}

pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Extension(current): Extension<CurrentUser>,
    form: Result<Form<UserSignupForm>, FormRejection>,
) -> Result<Response, Error> {
    let Form(mut form) = form.map_err(|_| Error::BadRequest)?;
    csrf::verify(&session, &form.csrf_token).await?;

    if !form.validate() {
        let page = PageData::gather(&session, current).await?;
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render::signup(&page, &form)),
        )
            .into_response());
    }

    let store = state.users.clone();
    let (name, email, password) = (form.name.clone(), form.email.clone(), form.password.clone());
    let result = tokio::task::spawn_blocking(move || store.insert(&name, &email, &password))
        .await
        .map_err(Error::join)?;

    match result {
        Ok(()) => {
            session::set_flash(&session, "Your signup was successful. Please log in").await?;
            Ok(Redirect::to("/user/login").into_response())
        }
        Err(ModelError::DuplicateEmail) => {
            form.validator
                .add_field_error("email", "Email address is already in use");
            let page = PageData::gather(&session, current).await?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render::signup(&page, &form)),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_form(
    session: Session,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let page = PageData::gather(&session, current).await?;
    Ok(Html(render::login(&page, &UserLoginForm::default())).into_response())
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Extension(current): Extension<CurrentUser>,
    form: Result<Form<UserLoginForm>, FormRejection>,
) -> Result<Response, Error> {
    let Form(mut form) = form.map_err(|_| Error::BadRequest)?;
    csrf::verify(&session, &form.csrf_token).await?;

    if !form.validate() {
        let page = PageData::gather(&session, current).await?;
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render::login(&page, &form)),
        )
            .into_response());
    }

    let store = state.users.clone();
    let (email, password) = (form.email.clone(), form.password.clone());
    let result = tokio::task::spawn_blocking(move || store.authenticate(&email, &password))
        .await
        .map_err(Error::join)?;

    match result {
        Ok(id) => {
            // Session fixation: rotate the id on privilege change.
            session.cycle_id().await?;
            session.insert(session::AUTH_USER_ID_KEY, id).await?;

            let dest = session
                .remove::<String>(session::PATH_BEFORE_LOGIN_KEY)
                .await?
                .unwrap_or_else(|| "/snippet/create".to_string());
            Ok(Redirect::to(&dest).into_response())
        }
        Err(ModelError::InvalidCredentials) => {
            form.validator
                .add_non_field_error("Email or password is incorrect");
            let page = PageData::gather(&session, current).await?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render::login(&page, &form)),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(
    session: Session,
    form: Result<Form<LogoutForm>, FormRejection>,
) -> Result<Response, Error> {
    let Form(form) = form.map_err(|_| Error::BadRequest)?;
    csrf::verify(&session, &form.csrf_token).await?;

    session.cycle_id().await?;
    session.remove::<i64>(session::AUTH_USER_ID_KEY).await?;
    session::set_flash(&session, "You've been logged out successfully!").await?;
    Ok(Redirect::to("/").into_response())
}
