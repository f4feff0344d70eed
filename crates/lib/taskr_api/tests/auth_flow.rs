//! Auth endpoints driven through the router with in-memory stores.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use taskr_core::auth::jwt::TokenIssuer;

use common::*;

#[tokio::test]
async fn register_login_use_refresh_and_reject_old_token() {
    let app = app();

    let resp = register(&app, "alice", "pw1").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["username"], "alice");
    assert!(resp.json["id"].is_i64());
    assert!(resp.json.get("password_hash").is_none());

    let resp = login(&app, "alice", "pw1").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["token_type"], "bearer");
    let access = resp.json["access_token"].as_str().unwrap().to_string();
    let old_refresh = resp.json["refresh_token"].as_str().unwrap().to_string();

    let resp = send(&app, authed("GET", "/tasks", &access, None)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json, serde_json::json!([]));

    let resp = refresh(&app, &old_refresh).await;
    assert_eq!(resp.status, StatusCode::OK);
    let new_refresh = resp.json["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, old_refresh);

    let resp = refresh(&app, &old_refresh).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = refresh(&app, &new_refresh).await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = app();
    assert_eq!(register(&app, "alice", "pw1").await.status, StatusCode::OK);

    let resp = register(&app, "alice", "other").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json["error"], "username_taken");
}

#[tokio::test]
async fn registration_requires_username_and_password() {
    let app = app();
    let resp = register(&app, "", "pw1").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    let resp = register(&app, "alice", "").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn username_whitespace_is_stripped_on_registration() {
    let app = app();
    let resp = register(&app, " alice ", "pw1").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["username"], "alice");

    let resp = register(&app, "alice", "pw2").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json["error"], "username_taken");

    assert_eq!(login(&app, "alice", "pw1").await.status, StatusCode::OK);
}

#[tokio::test]
async fn overlong_password_is_rejected_at_registration() {
    let app = app();
    let password = format!("{}one", "a".repeat(72));
    let resp = register(&app, "alice", &password).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json["error"], "validation_error");

    // Nothing was created, so the name is still free.
    assert_eq!(register(&app, "alice", "pw1").await.status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let app = app();

    let resp = send(
        &app,
        json_request(
            "POST",
            "/auth/register",
            serde_json::json!({"username": "alice"}),
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json["error"], "validation_error");

    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=alice"))
        .unwrap();
    let resp = send(&app, req).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json["error"], "validation_error");
}

#[tokio::test]
async fn bad_credentials_share_one_response() {
    let app = app();
    register(&app, "alice", "pw1").await;

    let wrong_password = login(&app, "alice", "nope").await;
    let unknown_user = login(&app, "bob", "pw1").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.json, unknown_user.json);
    assert_eq!(
        wrong_password.headers.get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn refresh_accepts_json_body() {
    let app = app();
    let (_, refresh_token) = session(&app, "alice", "pw1").await;

    let resp = send(
        &app,
        json_request(
            "POST",
            "/auth/refresh",
            serde_json::json!({"refresh_token": refresh_token}),
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["token_type"], "bearer");
}

#[tokio::test]
async fn refresh_without_token_is_bad_request() {
    let app = app();
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/refresh")
        .body(axum::body::Body::empty())
        .unwrap();
    assert_eq!(send(&app, req).await.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forged_refresh_tokens_are_rejected() {
    let app = app();
    let (_, refresh_token) = session(&app, "alice", "pw1").await;

    let forger =
        TokenIssuer::new(b"some-other-secret-entirely-32ch!", Algorithm::HS256).unwrap();
    let foreign = forger.create_refresh_token("alice").unwrap();
    assert_eq!(refresh(&app, &foreign).await.status, StatusCode::UNAUTHORIZED);

    let mut tampered = refresh_token.clone();
    tampered.push('x');
    assert_eq!(refresh(&app, &tampered).await.status, StatusCode::UNAUTHORIZED);

    assert_eq!(refresh(&app, "garbage").await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_for_deleted_or_unknown_user_looks_like_invalid_token() {
    let app = app();
    let issuer = TokenIssuer::new(SECRET.as_bytes(), Algorithm::HS256).unwrap();
    let ghost = issuer.create_refresh_token("ghost").unwrap();
    let garbage = refresh(&app, "garbage").await;

    let resp = refresh(&app, &ghost).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.json, garbage.json);
}

#[tokio::test]
async fn expired_access_token_is_unauthorized() {
    let app = app();
    session(&app, "alice", "pw1").await;

    let issuer = TokenIssuer::new(SECRET.as_bytes(), Algorithm::HS256).unwrap();
    let expired = issuer
        .create_access_token("alice", Duration::seconds(-60))
        .unwrap();

    let resp = send(&app, authed("GET", "/tasks", &expired, None)).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_bearer_access_token() {
    let app = app();
    let (_, refresh_token) = session(&app, "alice", "pw1").await;

    let no_header = axum::http::Request::builder()
        .uri("/tasks")
        .body(axum::body::Body::empty())
        .unwrap();
    assert_eq!(send(&app, no_header).await.status, StatusCode::UNAUTHORIZED);

    let basic = axum::http::Request::builder()
        .uri("/tasks")
        .header(header::AUTHORIZATION, "Basic YWxpY2U6cHcx")
        .body(axum::body::Body::empty())
        .unwrap();
    assert_eq!(send(&app, basic).await.status, StatusCode::UNAUTHORIZED);

    // A refresh token is not a bearer credential.
    let resp = send(&app, authed("GET", "/tasks", &refresh_token, None)).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_caller() {
    let app = app();
    let (access, _) = session(&app, "alice", "pw1").await;

    let resp = send(&app, authed("GET", "/auth/me", &access, None)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["username"], "alice");
}

#[tokio::test]
async fn logout_invalidates_refresh_token() {
    let app = app();
    let (access, refresh_token) = session(&app, "alice", "pw1").await;

    let resp = send(&app, authed("POST", "/auth/logout", &access, None)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["success"], true);

    assert_eq!(
        refresh(&app, &refresh_token).await.status,
        StatusCode::UNAUTHORIZED
    );
}
