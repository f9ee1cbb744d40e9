use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Extension,
};
use tower_sessions::cookie::{time, Cookie, SameSite};
use tracing::instrument;

use crate::dtos::auth::{LoginRequest, RegisterRequest, SessionResponse};
use crate::dtos::user::UserResponse;
use crate::error::AppError;
use crate::extract::AppJson;
use crate::middleware::auth::{AuthContext, SESSION_COOKIE};
use crate::response::ApiResponse;
use crate::state::AppState;

fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> Cookie<'_> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age_seconds))
        .secure(secure)
        .build()
}

fn with_cookie(state: &AppState, response: ApiResponse<SessionResponse>, token: &str) -> impl IntoResponse {
    let max_age = state.auth.session_ttl().num_seconds();
    let cookie = session_cookie(token, max_age, state.cookie_secure);
    ([(header::SET_COOKIE, cookie.to_string())], response)
}

// POST /api/auth/login
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.auth.login(payload).await?;
    let token = session.token.clone();
    Ok(with_cookie(&state, ApiResponse::ok(session), &token))
}

// POST /api/auth/register
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.auth.register(payload).await?;
    let token = session.token.clone();
    Ok(with_cookie(&state, ApiResponse::created(session), &token))
}

// POST /api/auth/logout
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.logout(&auth).await?;
    let mut cleared = session_cookie("", 0, state.cookie_secure);
    cleared.make_removal();
    Ok(([(header::SET_COOKIE, cleared.to_string())], ApiResponse::message("Sesión cerrada")))
}

// GET /api/auth/me
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let user = state.users.get_user(auth.user_id).await?;
    Ok(ApiResponse::ok(user))
}
