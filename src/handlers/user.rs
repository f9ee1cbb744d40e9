// Admin user management: /api/users
use axum::{extract::State, Extension};
use tracing::instrument;

use crate::dtos::user::{CreateUserRequest, DeletedResponse, UpdateUserRequest, UserResponse};
use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthContext;
use crate::response::ApiResponse;
use crate::state::AppState;

// GET /api/users
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<ApiResponse<Vec<UserResponse>>, AppError> {
    let users = state.users.list_users().await?;
    Ok(ApiResponse::ok(users))
}

// GET /api/users/{id}
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let user = state.users.get_user(id).await?;
    Ok(ApiResponse::ok(user))
}

// POST /api/users
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let user = state.users.create_user(payload).await?;
    Ok(ApiResponse::created(user).with_message("Usuario creado correctamente"))
}

// PUT /api/users/{id}
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let user = state.users.update_user(auth.user_id, id, payload).await?;
    Ok(ApiResponse::ok(user).with_message("Usuario actualizado correctamente"))
}

// DELETE /api/users/{id}
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<DeletedResponse>, AppError> {
    state.users.delete_user(auth.user_id, id).await?;
    Ok(ApiResponse::ok(DeletedResponse { id }).with_message("Usuario eliminado correctamente"))
}
