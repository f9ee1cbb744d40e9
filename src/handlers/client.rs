// Client dashboard: /client/*. Every handler acts on the caller's own rows.
use axum::{extract::State, Extension};
use tracing::instrument;

use crate::dtos::client::{ChangePasswordRequest, UpdateProfileRequest, UpdateStatusRequest};
use crate::dtos::user::UserResponse;
use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthContext;
use crate::models::business::{Activity, ClientStats, Order, Payment, Project, Quote};
use crate::response::ApiResponse;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<ClientStats>, AppError> {
    Ok(ApiResponse::ok(state.client.stats(auth.user_id).await?))
}

#[instrument(skip(state))]
pub async fn projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<Vec<Project>>, AppError> {
    Ok(ApiResponse::ok(state.client.projects(auth.user_id).await?))
}

#[instrument(skip(state))]
pub async fn payments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<Vec<Payment>>, AppError> {
    Ok(ApiResponse::ok(state.client.payments(auth.user_id).await?))
}

#[instrument(skip(state))]
pub async fn activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<Vec<Activity>>, AppError> {
    Ok(ApiResponse::ok(state.client.activity(auth.user_id).await?))
}

#[instrument(skip(state))]
pub async fn quotes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<Vec<Quote>>, AppError> {
    Ok(ApiResponse::ok(state.client.quotes(auth.user_id).await?))
}

#[instrument(skip(state))]
pub async fn orders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<Vec<Order>>, AppError> {
    Ok(ApiResponse::ok(state.client.orders(auth.user_id).await?))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    Ok(ApiResponse::ok(state.client.profile(auth.user_id).await?))
}

// PUT /client/quotes/{id}/status
#[instrument(skip(state, payload))]
pub async fn update_quote_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<ApiResponse<Quote>, AppError> {
    let quote = state.client.update_quote_status(auth.user_id, id, payload).await?;
    Ok(ApiResponse::ok(quote).with_message("Presupuesto actualizado"))
}

// PUT /client/orders/{id}/status
#[instrument(skip(state, payload))]
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<ApiResponse<Order>, AppError> {
    let order = state.client.update_order_status(auth.user_id, id, payload).await?;
    Ok(ApiResponse::ok(order).with_message("Pedido actualizado"))
}

// PUT /client/profile
#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let user = state.client.update_profile(auth.user_id, payload).await?;
    Ok(ApiResponse::ok(user).with_message("Perfil actualizado"))
}

// PUT /client/change-password
#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> Result<ApiResponse<()>, AppError> {
    state.client.change_password(auth.user_id, payload).await?;
    Ok(ApiResponse::message("Contraseña actualizada correctamente"))
}
