//! End-to-end checks through the full router over in-memory storage.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::app;
use crate::models::user::Role;
use crate::repository::ContactRepository;
use crate::test_support::TestContext;

struct TestApp {
    ctx: TestContext,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let ctx = TestContext::new();
        let router = app(ctx.state.clone(), None);
        Self { ctx, router }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.raw(builder.body(body).unwrap()).await
    }

    async fn raw(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, body)
    }

    async fn login_as(&self, email: &str, role: Role) -> String {
        self.ctx.seed_user(email, "secret123", role).await;
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": "secret123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn unknown_route_gets_json_404() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn admin_creates_user_without_leaking_hash() {
    let app = TestApp::new();
    let token = app.login_as("admin@x.com", Role::Admin).await;
    let payload = json!({ "nombre": "Ana", "email": "ana@x.com", "password": "secret123" });

    let (status, body) = app.send(Method::POST, "/api/users", Some(&token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["rol"], "client");
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());

    let (status, body) = app.send(Method::POST, "/api/users", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn missing_user_is_404() {
    let app = TestApp::new();
    let token = app.login_as("admin@x.com", Role::Admin).await;
    let (status, body) = app.send(Method::GET, "/api/users/9999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let app = TestApp::new();
    let token = app.login_as("admin@x.com", Role::Admin).await;
    let (status, _) = app.send(Method::GET, "/api/users/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn client_cannot_manage_users() {
    let app = TestApp::new();
    let token = app.login_as("ana@x.com", Role::Client).await;
    let (status, body) = app.send(Method::GET, "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn dashboard_requires_a_session() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/client/stats", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());

    let (status, _) = app.send(Method::GET, "/client/stats", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_is_refused_on_client_dashboard() {
    let app = TestApp::new();
    let token = app.login_as("admin@x.com", Role::Admin).await;
    let (status, _) = app.send(Method::GET, "/client/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn client_sees_own_stats() {
    let app = TestApp::new();
    let token = app.login_as("ana@x.com", Role::Client).await;
    let (status, body) = app.send(Method::GET, "/client/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"].is_object());
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let app = TestApp::new();
    let token = app.login_as("ana@x.com", Role::Client).await;
    let req = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.raw(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ana@x.com");
}

#[tokio::test]
async fn quoted_session_cookie_is_accepted() {
    let app = TestApp::new();
    let token = app.login_as("ana@x.com", Role::Client).await;
    let req = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("theme=dark; session=\"{token}\""))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.raw(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ana@x.com");
}

#[tokio::test]
async fn login_sets_http_only_cookie_and_logout_expires_it() {
    let app = TestApp::new();
    app.ctx.seed_user("ana@x.com", "secret123", Role::Client).await;
    let login = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "email": "ana@x.com", "password": "secret123" }).to_string()))
        .unwrap();
    let res = app.router.clone().oneshot(login).await.unwrap();
    let cookie = res.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
    let token = cookie["session=".len()..].split(';').next().unwrap().to_string();

    let logout = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let res = app.router.clone().oneshot(logout).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = res.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.starts_with("session=;"));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn client_can_clear_profile_fields() {
    let app = TestApp::new();
    let token = app.login_as("ana@x.com", Role::Client).await;

    let (status, body) = app
        .send(Method::PUT, "/client/profile", Some(&token), Some(json!({ "telefono": "600000000" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["telefono"], "600000000");

    let (status, body) = app
        .send(Method::PUT, "/client/profile", Some(&token), Some(json!({ "telefono": "" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["telefono"].is_null());

    let (_, body) = app.send(Method::GET, "/client/profile", Some(&token), None).await;
    assert!(body["data"]["telefono"].is_null());
}

#[tokio::test]
async fn wrong_method_gets_json_405() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::DELETE, "/api/contact", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn admin_cannot_demote_self_over_http() {
    let app = TestApp::new();
    let token = app.login_as("admin@x.com", Role::Admin).await;
    let (_, me) = app.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    let uri = format!("/api/users/{}", me["data"]["id"]);

    let (status, body) = app.send(Method::PUT, &uri, Some(&token), Some(json!({ "rol": "client" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = app.send(Method::GET, "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let app = TestApp::new();
    let token = app.login_as("ana@x.com", Role::Client).await;

    let (status, _) = app.send(Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/client/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn client_answers_a_quote_once() {
    let app = TestApp::new();
    let admin = app.login_as("admin@x.com", Role::Admin).await;
    let client = app.login_as("ana@x.com", Role::Client).await;
    let (_, me) = app.send(Method::GET, "/api/auth/me", Some(&client), None).await;
    let client_id = me["data"]["id"].as_i64().unwrap();

    let (status, quote) = app
        .send(
            Method::POST,
            "/api/admin/quotes",
            Some(&admin),
            Some(json!({ "user_id": client_id, "title": "Web", "amount": 1200.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/client/quotes/{}/status", quote["data"]["id"]);

    let (status, body) = app
        .send(Method::PUT, &uri, Some(&client), Some(json!({ "status": "accepted" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "accepted");

    let (status, _) = app
        .send(Method::PUT, &uri, Some(&client), Some(json!({ "status": "rejected" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, activity) = app.send(Method::GET, "/client/activity", Some(&client), None).await;
    assert_eq!(activity["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn contact_form_validation() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::POST, "/api/contact", None, Some(json!({ "nombre": "Ana" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/contact",
            None,
            Some(json!({ "nombre": "Ana", "email": "ana@x.com", "mensaje": "Hola" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(app.ctx.contact.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = TestApp::new();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.raw(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
