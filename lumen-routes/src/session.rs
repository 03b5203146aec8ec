use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use lumen_core::{AppState, auth};
use lumen_database::model::user::User;

use crate::{cookies, error::ApiError};

/// Route guard: resolves the session cookie to a user, or redirects to `/login`.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = cookies::session_token(&parts.headers) else {
            return Err(Redirect::to("/login").into_response());
        };

        match auth::authenticate(state, &token).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => Err(Redirect::to("/login").into_response()),
            Err(err) => Err(ApiError::from(err).into_response()),
        }
    }
}
