use axum::{Router, routing::get, middleware};
use crate::state::AppState;
use crate::handlers::user::{create_user, delete_user, get_user, list_users, update_user};
use crate::middleware::auth::{require_admin, require_auth};

// Layers run bottom-up: the session is resolved before the role check.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
