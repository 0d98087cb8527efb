use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    dtos::contactdtos::{AgentContactData, AgentContactDto, AgentContactResponseDto, CreateContactDto},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    AppState,
};

pub async fn create_contact(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    body: Result<Json<CreateContactDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body.map_err(|rejection| HttpError::bad_request(rejection.body_text()))?;

    let contact = app_state
        .contact_service
        .create(user.user_id, body)
        .await
        .map_err(|e| {
            tracing::warn!("Lead rejected for user {} ({}): {}", user.user_id, e.status_code(), e);
            HttpError::from(e)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(AgentContactResponseDto {
            status: "success".to_string(),
            data: AgentContactData {
                contact: AgentContactDto::from_contact(&contact),
            },
        }),
    ))
}
