use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::errors::AppError;
use common::models::{AccountCredentials, AuthResponse, LogoutRequest, MessageResponse};
use tracing::info;

use crate::routes::AppState;

/// Auth failures keep the `{ "message": ... }` body shape of the success payloads.
#[derive(Debug)]
pub struct AuthFailure {
    status: StatusCode,
    message: String,
}

impl AuthFailure {
    /// Status follows the error kind: provider refusals are 400, outages 500.
    fn from_provider(err: AppError) -> Self {
        err.log();
        Self {
            status: err.kind().status_code(),
            message: err.public_message(),
        }
    }

    /// Logout failures are always reported as server errors.
    fn server(err: AppError) -> Self {
        err.log();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.public_message(),
        }
    }
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        (self.status, Json(MessageResponse::new(self.message))).into_response()
    }
}

fn credentials(
    payload: Result<Json<AccountCredentials>, JsonRejection>,
) -> Result<AccountCredentials, AuthFailure> {
    payload
        .map(|Json(credentials)| credentials)
        .map_err(|rejection| AuthFailure::from_provider(AppError::validation(rejection.body_text())))
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = AccountCredentials,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Rejected by the identity provider", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<AccountCredentials>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthFailure> {
    let credentials = credentials(payload)?;

    let uid = state
        .identity
        .create_account(&credentials.email, &credentials.password)
        .await
        .map_err(AuthFailure::from_provider)?;

    info!(uid = %uid, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully!".to_string(),
            uid,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = AccountCredentials,
    responses(
        (status = 200, description = "User authenticated successfully", body = AuthResponse),
        (status = 400, description = "Unknown account or wrong password", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<AccountCredentials>, JsonRejection>,
) -> Result<Json<AuthResponse>, AuthFailure> {
    let credentials = credentials(payload)?;

    let account = state
        .identity
        .find_by_email(&credentials.email)
        .await
        .map_err(AuthFailure::from_provider)?;

    state
        .identity
        .verify_credential(&credentials.email, &credentials.password)
        .await
        .map_err(AuthFailure::from_provider)?;

    info!(uid = %account.uid, "User logged in");

    Ok(Json(AuthResponse {
        message: "User authenticated successfully!".to_string(),
        uid: account.uid,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body(
        content = LogoutRequest,
        description = "Optional uid whose sessions are revoked"
    ),
    responses(
        (status = 200, description = "User logged out successfully", body = MessageResponse),
        (status = 400, description = "Body is not valid JSON", body = MessageResponse),
        (status = 500, description = "Identity provider failure", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AuthFailure> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        LogoutRequest::default()
    } else {
        serde_json::from_slice::<LogoutRequest>(&body).map_err(|e| {
            AuthFailure::from_provider(AppError::validation(format!("Invalid logout body: {}", e)))
        })?
    };

    state
        .identity
        .end_session(request.uid.as_deref())
        .await
        .map_err(AuthFailure::server)?;

    Ok(Json(MessageResponse::new("User logged out successfully!")))
}
