mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use support::{FakeIdentity, app_with_identity, assert_cors, json, post_json, send};

#[tokio::test]
async fn signup_forwards_credentials_unchanged() {
    let identity = Arc::new(FakeIdentity::default());
    let router = app_with_identity(identity.clone());

    let (status, headers, body) = send(
        router,
        post_json(
            "/auth/signup",
            json!({ "email": " Mixed.Case@Example.com ", "password": "p@ss word" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_cors(&headers);
    assert_eq!(
        json(&body),
        json!({ "message": "User created successfully!", "uid": "uid-1" })
    );
    assert_eq!(
        identity.created.lock().expect("created lock").as_slice(),
        &[(" Mixed.Case@Example.com ".to_string(), "p@ss word".to_string())]
    );
}

#[tokio::test]
async fn signup_rejection_is_bad_request_with_provider_text() {
    let identity = Arc::new(FakeIdentity::with_account("taken@example.com", "secret1", "uid-9"));

    let (status, headers, body) = send(
        app_with_identity(identity),
        post_json(
            "/auth/signup",
            json!({ "email": "taken@example.com", "password": "another1" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_cors(&headers);
    assert_eq!(
        json(&body),
        json!({ "message": "The email address is already in use by another account." })
    );
}

#[tokio::test]
async fn signup_with_missing_fields_still_reaches_provider() {
    let identity = Arc::new(FakeIdentity::default());

    let (status, _, _) = send(
        app_with_identity(identity.clone()),
        post_json("/auth/signup", json!({ "email": "only@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        identity.created.lock().expect("created lock")[0],
        ("only@example.com".to_string(), String::new())
    );
}

#[tokio::test]
async fn signup_with_malformed_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");

    let (status, _, body) = send(app_with_identity(Arc::new(FakeIdentity::default())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["message"].is_string());
}

#[tokio::test]
async fn signup_during_provider_outage_is_server_error() {
    let identity = Arc::new(FakeIdentity::with_outage());

    let (status, _, body) = send(
        app_with_identity(identity),
        post_json(
            "/auth/signup",
            json!({ "email": "new@example.com", "password": "secret1" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), json!({ "message": "Server error" }));
}

#[tokio::test]
async fn login_returns_looked_up_uid() {
    let identity = Arc::new(FakeIdentity::with_account("ada@example.com", "secret1", "uid-ada"));

    let (status, headers, body) = send(
        app_with_identity(identity),
        post_json(
            "/auth/login",
            json!({ "email": "ada@example.com", "password": "secret1" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_cors(&headers);
    assert_eq!(
        json(&body),
        json!({ "message": "User authenticated successfully!", "uid": "uid-ada" })
    );
}

#[tokio::test]
async fn login_with_unknown_email_is_bad_request() {
    let (status, _, body) = send(
        app_with_identity(Arc::new(FakeIdentity::default())),
        post_json(
            "/auth/login",
            json!({ "email": "ghost@example.com", "password": "secret1" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json(&body)["message"],
        "There is no user record corresponding to the provided identifier."
    );
}

#[tokio::test]
async fn login_with_wrong_password_is_bad_request() {
    let identity = Arc::new(FakeIdentity::with_account("ada@example.com", "secret1", "uid-ada"));

    let (status, headers, body) = send(
        app_with_identity(identity),
        post_json(
            "/auth/login",
            json!({ "email": "ada@example.com", "password": "wrong" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_cors(&headers);
    assert!(json(&body).get("uid").is_none());
}

#[tokio::test]
async fn login_during_provider_outage_is_server_error() {
    let (status, headers, body) = send(
        app_with_identity(Arc::new(FakeIdentity::with_outage())),
        post_json(
            "/auth/login",
            json!({ "email": "ada@example.com", "password": "secret1" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&headers);
    assert_eq!(json(&body), json!({ "message": "Server error" }));
}

#[tokio::test]
async fn logout_without_body_succeeds() {
    let identity = Arc::new(FakeIdentity::default());
    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .body(Body::empty())
        .expect("request");

    let (status, headers, body) = send(app_with_identity(identity.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_cors(&headers);
    assert_eq!(
        json(&body),
        json!({ "message": "User logged out successfully!" })
    );
    assert_eq!(identity.ended.lock().expect("ended lock").as_slice(), &[None]);
}

#[tokio::test]
async fn logout_forwards_uid() {
    let identity = Arc::new(FakeIdentity::default());

    let (status, _, _) = send(
        app_with_identity(identity.clone()),
        post_json("/auth/logout", json!({ "uid": "uid-ada" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        identity.ended.lock().expect("ended lock").as_slice(),
        &[Some("uid-ada".to_string())]
    );
}

#[tokio::test]
async fn logout_provider_failure_is_server_error() {
    let identity = Arc::new(FakeIdentity::failing_logout());

    let (status, headers, body) = send(
        app_with_identity(identity),
        post_json("/auth/logout", json!({ "uid": "uid-ada" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&headers);
    assert!(json(&body)["message"].is_string());
}
