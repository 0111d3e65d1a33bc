use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::handlers as auth;
use crate::location::handlers as location;
use crate::routes;
use crate::weather::handlers as weather;
use common::errors::ErrorResponse;
use common::models::{
    AccountCredentials, AuthResponse, CurrentWeather, LogoutRequest, MessageResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health,
        auth::signup,
        auth::login,
        auth::logout,
        weather::current_by_city,
        weather::detailed_by_coordinates,
        location::search,
        location::reverse,
    ),
    components(schemas(
        AccountCredentials,
        AuthResponse,
        LogoutRequest,
        MessageResponse,
        CurrentWeather,
        ErrorResponse,
    )),
    tags(
        (name = "auth", description = "Account signup, login and logout"),
        (name = "weather", description = "Current conditions and forecasts"),
        (name = "location", description = "Place search and reverse geocoding"),
    ),
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
