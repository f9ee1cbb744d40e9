// Back office: /api/admin/*
use axum::extract::State;
use tracing::instrument;

use crate::dtos::admin::{
    CreateOrderRequest, CreatePaymentRequest, CreateProjectRequest, CreateQuoteRequest, UpdateProjectRequest,
};
use crate::dtos::user::DeletedResponse;
use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::business::{Order, Payment, Project, Quote};
use crate::models::contact::ContactMessage;
use crate::response::ApiResponse;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn list_projects(State(state): State<AppState>) -> Result<ApiResponse<Vec<Project>>, AppError> {
    Ok(ApiResponse::ok(state.admin.projects().await?))
}

#[instrument(skip(state, payload))]
pub async fn create_project(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProjectRequest>,
) -> Result<ApiResponse<Project>, AppError> {
    Ok(ApiResponse::created(state.admin.create_project(payload).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_project(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateProjectRequest>,
) -> Result<ApiResponse<Project>, AppError> {
    Ok(ApiResponse::ok(state.admin.update_project(id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<DeletedResponse>, AppError> {
    state.admin.delete_project(id).await?;
    Ok(ApiResponse::ok(DeletedResponse { id }).with_message("Proyecto eliminado"))
}

#[instrument(skip(state))]
pub async fn list_quotes(State(state): State<AppState>) -> Result<ApiResponse<Vec<Quote>>, AppError> {
    Ok(ApiResponse::ok(state.admin.quotes().await?))
}

#[instrument(skip(state, payload))]
pub async fn create_quote(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateQuoteRequest>,
) -> Result<ApiResponse<Quote>, AppError> {
    Ok(ApiResponse::created(state.admin.create_quote(payload).await?))
}

#[instrument(skip(state))]
pub async fn list_orders(State(state): State<AppState>) -> Result<ApiResponse<Vec<Order>>, AppError> {
    Ok(ApiResponse::ok(state.admin.orders().await?))
}

#[instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> Result<ApiResponse<Order>, AppError> {
    Ok(ApiResponse::created(state.admin.create_order(payload).await?))
}

#[instrument(skip(state))]
pub async fn list_payments(State(state): State<AppState>) -> Result<ApiResponse<Vec<Payment>>, AppError> {
    Ok(ApiResponse::ok(state.admin.payments().await?))
}

#[instrument(skip(state, payload))]
pub async fn create_payment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePaymentRequest>,
) -> Result<ApiResponse<Payment>, AppError> {
    Ok(ApiResponse::created(state.admin.create_payment(payload).await?))
}

#[instrument(skip(state))]
pub async fn list_contact_messages(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ContactMessage>>, AppError> {
    Ok(ApiResponse::ok(state.contact.list().await?))
}
