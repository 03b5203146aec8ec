use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use lumen_core::{AppError, AppState, auth};
use serde::Deserialize;
use tracing::warn;

use crate::{cookies, error::ApiError, session::CurrentUser, views};

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn index(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Html<String> {
    Html(views::main_page(&user, state.llm.is_some()))
}

pub async fn login_form() -> Html<String> {
    Html(views::login_page(None))
}

pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match auth::login(&state, &form.username, &form.password).await {
        Ok(grant) => session_redirect(&state, &grant),
        Err(err @ AppError::InvalidCredentials) => {
            Html(views::login_page(Some(&err.to_string()))).into_response()
        }
        Err(err) => ApiError(err).into_response(),
    }
}

pub async fn signup_form() -> Html<String> {
    Html(views::signup_page(None))
}

pub async fn signup_submit(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match auth::signup(&state, &form.username, &form.password).await {
        Ok(grant) => session_redirect(&state, &grant),
        Err(
            err @ (AppError::DuplicateUser
            | AppError::UsernameTooLong(_)
            | AppError::MissingParameter(_)),
        ) => {
            Html(views::signup_page(Some(&err.to_string()))).into_response()
        }
        Err(err) => ApiError(err).into_response(),
    }
}

/// Always clears the cookie and lands on `/login`, even if the store delete fails.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = cookies::session_token(&headers) {
        if let Err(err) = auth::logout(&state, &token).await {
            warn!(?err, "failed to delete session on logout");
        }
    }

    let cookie = cookies::clear_session_cookie(state.settings.secure_cookies);
    (AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to("/login")).into_response()
}

fn session_redirect(state: &AppState, grant: &auth::SessionGrant) -> Response {
    let cookie = cookies::session_cookie(
        &grant.token,
        state.settings.session_ttl.as_secs(),
        state.settings.secure_cookies,
    );
    (AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to("/")).into_response()
}
