//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use jsonwebtoken::Algorithm;
use taskr_api::config::ApiConfig;
use taskr_api::{AppState, router};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret-32-chars!!";

pub fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: None,
        jwt_secret: SECRET.into(),
        jwt_algorithm: Algorithm::HS256,
        access_token_ttl_minutes: 15,
    }
}

pub fn app() -> Router {
    router(AppState::in_memory(test_config()).expect("state"))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub json: serde_json::Value,
}

pub async fn send(app: &Router, req: Request<Body>) -> TestResponse {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).expect("parse JSON")
    };
    TestResponse {
        status,
        headers,
        json,
    }
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn register(app: &Router, username: &str, password: &str) -> TestResponse {
    send(
        app,
        json_request(
            "POST",
            "/auth/register",
            serde_json::json!({"username": username, "password": password}),
        ),
    )
    .await
}

pub async fn login(app: &Router, username: &str, password: &str) -> TestResponse {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "username={username}&password={password}"
        )))
        .unwrap();
    send(app, req).await
}

pub async fn refresh(app: &Router, refresh_token: &str) -> TestResponse {
    let req = Request::builder()
        .method("POST")
        .uri(format!("/auth/refresh?refresh_token={refresh_token}"))
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// Register + login, returning `(access_token, refresh_token)`.
pub async fn session(app: &Router, username: &str, password: &str) -> (String, String) {
    assert_eq!(register(app, username, password).await.status, StatusCode::OK);
    let resp = login(app, username, password).await;
    assert_eq!(resp.status, StatusCode::OK);
    (
        resp.json["access_token"].as_str().unwrap().to_string(),
        resp.json["refresh_token"].as_str().unwrap().to_string(),
    )
}
