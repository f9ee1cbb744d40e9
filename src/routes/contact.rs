use axum::{Router, routing::post};
use crate::state::AppState;
use crate::handlers::contact::submit;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/contact", post(submit))
}
