pub mod admin;
pub mod auth;
pub mod client;
pub mod contact;
pub mod users;

use axum::Router;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth::routes(state.clone()))
        .merge(contact::routes())
        .merge(users::routes(state.clone()))
        .merge(admin::routes(state.clone()))
        .merge(client::routes(state))
}
