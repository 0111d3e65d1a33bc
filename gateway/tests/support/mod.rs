#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
};
use common::errors::AppError;
use common::http_client::HttpClient;
use gateway::auth::{Account, IdentityProvider};
use gateway::location::api_client::GeoapifyClient;
use gateway::routes::{AppState, create_router};
use gateway::weather::api_client::OpenWeatherClient;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const WEATHER_KEY: &str = "weather-key";
pub const LOCATION_KEY: &str = "location-key";

/// In-memory identity provider that records what the handlers forward.
#[derive(Default)]
pub struct FakeIdentity {
    accounts: Mutex<HashMap<String, (String, String)>>,
    pub created: Mutex<Vec<(String, String)>>,
    pub ended: Mutex<Vec<Option<String>>>,
    pub outage: bool,
    pub fail_logout: bool,
}

impl FakeIdentity {
    pub fn with_account(email: &str, password: &str, uid: &str) -> Self {
        let fake = Self::default();
        fake.accounts.lock().expect("accounts lock").insert(
            email.to_string(),
            (uid.to_string(), password.to_string()),
        );
        fake
    }

    /// Every provider call fails as if the provider timed out.
    pub fn with_outage() -> Self {
        Self {
            outage: true,
            ..Self::default()
        }
    }

    /// Logout fails with a provider 503; everything else works.
    pub fn failing_logout() -> Self {
        Self {
            fail_logout: true,
            ..Self::default()
        }
    }

    fn check_outage(&self) -> Result<(), AppError> {
        if self.outage {
            return Err(AppError::timeout("identity provider timed out"));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn create_account(&self, email: &str, password: &str) -> Result<String, AppError> {
        self.created
            .lock()
            .expect("created lock")
            .push((email.to_string(), password.to_string()));
        self.check_outage()?;

        let mut accounts = self.accounts.lock().expect("accounts lock");
        if accounts.contains_key(email) {
            return Err(AppError::rejected(
                "The email address is already in use by another account.",
            ));
        }
        let uid = format!("uid-{}", accounts.len() + 1);
        accounts.insert(email.to_string(), (uid.clone(), password.to_string()));
        Ok(uid)
    }

    async fn find_by_email(&self, email: &str) -> Result<Account, AppError> {
        self.check_outage()?;
        self.accounts
            .lock()
            .expect("accounts lock")
            .get(email)
            .map(|(uid, _)| Account { uid: uid.clone() })
            .ok_or_else(|| {
                AppError::rejected(
                    "There is no user record corresponding to the provided identifier.",
                )
            })
    }

    async fn verify_credential(&self, email: &str, password: &str) -> Result<(), AppError> {
        self.check_outage()?;
        match self.accounts.lock().expect("accounts lock").get(email) {
            Some((_, stored)) if stored == password => Ok(()),
            _ => Err(AppError::rejected(
                "The supplied auth credential is incorrect, malformed or has expired.",
            )),
        }
    }

    async fn end_session(&self, uid: Option<&str>) -> Result<(), AppError> {
        self.ended
            .lock()
            .expect("ended lock")
            .push(uid.map(str::to_string));
        if self.fail_logout {
            return Err(AppError::http(503, "identity provider unavailable"));
        }
        Ok(())
    }
}

pub fn app(weather_uri: &str, location_uri: &str, identity: Arc<dyn IdentityProvider>) -> Router {
    let http_client = HttpClient::new(2).expect("http client");
    create_router(AppState {
        identity,
        weather: Arc::new(OpenWeatherClient::new(
            http_client.clone(),
            weather_uri.to_string(),
            WEATHER_KEY.to_string(),
        )),
        location: Arc::new(GeoapifyClient::new(
            http_client,
            location_uri.to_string(),
            LOCATION_KEY.to_string(),
        )),
    })
}

/// Router whose upstreams are unreachable; for tests that never leave the gateway.
pub fn app_with_identity(identity: Arc<dyn IdentityProvider>) -> Router {
    app("http://127.0.0.1:9", "http://127.0.0.1:9", identity)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, headers, body)
}

pub fn json(body: &Bytes) -> serde_json::Value {
    serde_json::from_slice(body).expect("json body")
}

pub fn assert_cors(headers: &HeaderMap) {
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    assert!(headers.contains_key("access-control-allow-headers"));
}
