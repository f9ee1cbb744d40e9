use axum::{Router, routing::{get, post}, middleware};
use crate::state::AppState;
use crate::handlers::auth::{login, logout, me, register};
use crate::middleware::auth::require_auth;

pub fn routes(state: AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register));

    let protected = Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    open.merge(protected)
}
