use axum::{Router, routing::{get, put}, middleware};
use crate::state::AppState;
use crate::handlers::admin::{
    create_order, create_payment, create_project, create_quote, delete_project, list_contact_messages,
    list_orders, list_payments, list_projects, list_quotes, update_project,
};
use crate::middleware::auth::{require_admin, require_auth};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/contact-messages", get(list_contact_messages))
        .route("/api/admin/projects", get(list_projects).post(create_project))
        .route("/api/admin/projects/{id}", put(update_project).delete(delete_project))
        .route("/api/admin/quotes", get(list_quotes).post(create_quote))
        .route("/api/admin/orders", get(list_orders).post(create_order))
        .route("/api/admin/payments", get(list_payments).post(create_payment))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
