use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ErrorMessage, HttpError},
    utils::token,
    AppState,
};

/// Identity of the authenticated caller, taken from the token subject.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct JWTAuthMiddleware {
    pub user_id: Uuid,
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_header| auth_header.to_str().ok())
        .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_owned())
        .or_else(|| {
            cookie_jar
                .get("token")
                .map(|cookie| cookie.value().to_string())
        })
        .filter(|token| !token.is_empty());

    let token = token.ok_or_else(|| {
        HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string())
    })?;

    let subject = token::decode_token(token, app_state.env.jwt_secret.as_bytes())?;

    let user_id = Uuid::parse_str(&subject)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    req.extensions_mut().insert(JWTAuthMiddleware { user_id });

    Ok(next.run(req).await)
}
