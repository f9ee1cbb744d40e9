use axum::{Router, routing::{get, put}, middleware};
use crate::state::AppState;
use crate::handlers::client::{
    activity, change_password, orders, payments, profile, projects, quotes, stats, update_order_status,
    update_profile, update_quote_status,
};
use crate::middleware::auth::{require_auth, require_client};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/client/stats", get(stats))
        .route("/client/projects", get(projects))
        .route("/client/payments", get(payments))
        .route("/client/activity", get(activity))
        .route("/client/quotes", get(quotes))
        .route("/client/quotes/{id}/status", put(update_quote_status))
        .route("/client/orders", get(orders))
        .route("/client/orders/{id}/status", put(update_order_status))
        .route("/client/profile", get(profile).put(update_profile))
        .route("/client/change-password", put(change_password))
        .route_layer(middleware::from_fn(require_client))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
