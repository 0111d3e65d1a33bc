use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Email and password pair for signup and login
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AccountCredentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful signup or login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub uid: String,
}

/// Plain message body, used for logout and for auth failures
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Optional logout body. Without a uid there is nothing to revoke.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct LogoutRequest {
    pub uid: Option<String>,
}

/// Current conditions for a named city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct CurrentWeather {
    /// Temperature in Celsius
    pub temperature: f64,
    pub description: String,
}
