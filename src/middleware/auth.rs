use axum::{
    body::Body,
    extract::State,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{header, HeaderMap, Request};
use tower_sessions::cookie::Cookie;

pub use crate::auth::AuthContext;
use crate::error::AppError;
use crate::models::user::Role;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Resolves the caller from `Authorization: Bearer <token>` or the session
/// cookie and attaches an [`AuthContext`] to the request.
pub async fn require_auth(State(state): State<AppState>, mut req: Request<Body>, next: Next) -> Response {
    let Some(token) = session_token(req.headers()) else {
        return AppError::unauthenticated("Debes iniciar sesión").into_response();
    };

    let ctx = match state.auth.authenticate(&token).await {
        Ok(ctx) => ctx,
        Err(e) => return e.into_response(),
    };

    tracing::Span::current().record("user_id", ctx.user_id);
    req.extensions_mut().insert(ctx);
    next.run(req).await
}

pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    match check_role(&req, Role::Admin, "Acceso denegado: se requiere rol de administrador") {
        Ok(()) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}

pub async fn require_client(req: Request<Body>, next: Next) -> Response {
    match check_role(&req, Role::Client, "Acceso denegado: se requiere rol de cliente") {
        Ok(()) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}

fn check_role(req: &Request<Body>, role: Role, denied: &str) -> Result<(), AppError> {
    match req.extensions().get::<AuthContext>() {
        Some(ctx) if ctx.role == role => Ok(()),
        Some(_) => Err(AppError::forbidden(denied)),
        None => Err(AppError::unauthenticated("Debes iniciar sesión")),
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .filter(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value_trimmed().to_string())
        .find(|value| !value.is_empty())
}
