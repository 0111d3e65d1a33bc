use common::errors::AppError;
use std::env;
use std::path::PathBuf;

pub struct Config {
    pub port: u16,
    pub weather_api_key: String,
    pub location_api_key: String,
    pub firebase_api_key: String,
    pub service_account_path: PathBuf,
    pub weather_base_url: String,
    pub location_base_url: String,
    pub identity_base_url: String,
    pub upstream_timeout_secs: u64,
}

impl Config {
    /// Read configuration from the environment. Call `dotenv` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            weather_api_key: required("WEATHER_API_KEY")?,
            location_api_key: required("LOCATION_API_KEY")?,
            firebase_api_key: required("FIREBASE_API_KEY")?,
            service_account_path: env::var("GOOGLE_APPLICATION_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("json/serviceAccountKey.json")),
            weather_base_url: base_url("WEATHER_BASE_URL", "https://api.openweathermap.org"),
            location_base_url: base_url("LOCATION_BASE_URL", "https://api.geoapify.com"),
            identity_base_url: base_url(
                "IDENTITY_BASE_URL",
                "https://identitytoolkit.googleapis.com",
            ),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(10),
        })
    }
}

fn required(name: &str) -> Result<String, AppError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("{} must be set", name)))
}

fn base_url(name: &str, default: &str) -> String {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
