pub mod auth;
pub mod config;
pub mod database;
pub mod dtos;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

use std::any::Any;

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::error::{method_not_allowed_fallback, not_found_fallback};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Full application: API routes, health probe, JSON 404 fallback and the
/// tower-http stack (tracing, CORS, panic recovery).
pub fn app(state: AppState, cors_origin: Option<&str>) -> Router {
    Router::new()
        .route("/", get(|| async { "Studio API" }))
        .route("/health", get(health_check))
        .merge(routes::create_router(state.clone()))
        .method_not_allowed_fallback(method_not_allowed_fallback)
        .fallback(not_found_fallback)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri(),
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors_layer(cors_origin))
        .layer(CatchPanicLayer::custom(panic_response))
}

async fn health_check() -> ApiResponse<serde_json::Value> {
    ApiResponse::ok(json!({ "status": "ok" }))
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => {
            tracing::warn!(origin, "invalid CORS_ORIGIN, falling back to permissive CORS");
            CorsLayer::permissive()
        }
    }
}

fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": "Error interno del servidor" })),
    )
        .into_response()
}
