use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use crate::dtos::contact::ContactRequest;
use crate::error::AppError;
use crate::extract::AppJson;
use crate::response::ApiResponse;
use crate::state::AppState;

// POST /api/contact
#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ContactRequest>,
) -> Result<ApiResponse<()>, AppError> {
    state.contact.submit(payload).await?;
    Ok(ApiResponse::message("Mensaje enviado correctamente. Te responderemos pronto.").status(StatusCode::CREATED))
}
