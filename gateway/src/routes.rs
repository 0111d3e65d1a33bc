use axum::{
    Router,
    http::{
        HeaderName, HeaderValue, Method,
        header::{ACCEPT, ACCESS_CONTROL_ALLOW_HEADERS, CONTENT_TYPE, ORIGIN},
    },
    response::Json,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{self, IdentityProvider};
use crate::location::{self, api_client::GeoapifyClient};
use crate::openapi;
use crate::weather::{self, api_client::OpenWeatherClient};

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");
const ALLOWED_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept";

/// Upstream clients shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub weather: Arc<OpenWeatherClient>,
    pub location: Arc<GeoapifyClient>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check")
    )
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "gateway" }))
}

pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/signup", post(auth::handlers::signup))
        .route("/auth/login", post(auth::handlers::login))
        .route("/auth/logout", post(auth::handlers::logout));

    let weather_routes = Router::new()
        .route("/weather/{city}", get(weather::handlers::current_by_city))
        .route(
            "/weather/{lat}/{lon}",
            get(weather::handlers::detailed_by_coordinates),
        );

    let location_routes = Router::new()
        .route("/location/query/{query}", get(location::handlers::search))
        .route("/location/coord/{lat}/{lon}", get(location::handlers::reverse));

    Router::new()
        .route("/health", get(health))
        .merge(auth_routes)
        .merge(weather_routes)
        .merge(location_routes)
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .with_state(state)
}

/// Any origin, and only the request headers browsers need for JSON calls.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ORIGIN, X_REQUESTED_WITH, CONTENT_TYPE, ACCEPT])
}
