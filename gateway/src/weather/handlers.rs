use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use common::errors::AppError;
use common::models::CurrentWeather;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::api_client::ForecastRequest;
use crate::routes::AppState;

/// Body of every weather failure. Upstream detail only goes to the logs.
pub const WEATHER_FAILURE_BODY: &str = "Error";

#[derive(Debug)]
pub struct WeatherFailure(AppError);

impl From<AppError> for WeatherFailure {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WeatherFailure {
    fn into_response(self) -> Response {
        self.0.log();
        (self.0.kind().status_code(), WEATHER_FAILURE_BODY).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    pub exclude: Option<String>,
    pub units: Option<String>,
}

#[utoipa::path(
    get,
    path = "/weather/{city}",
    params(
        ("city" = String, Path, description = "City name")
    ),
    responses(
        (status = 200, description = "Current temperature (Celsius) and conditions", body = CurrentWeather),
        (status = 500, description = "Lookup failed or the city is unreadable; body is the text `Error`")
    ),
    tag = "weather"
)]
pub async fn current_by_city(
    State(state): State<AppState>,
    city: Result<Path<String>, PathRejection>,
) -> Result<Json<CurrentWeather>, WeatherFailure> {
    let Path(city) = city.map_err(|rejection| AppError::unusable(rejection.body_text()))?;

    info!(city = %city, "Weather request received");

    let weather = state.weather.current_by_city(&city).await?;

    Ok(Json(weather))
}

#[utoipa::path(
    get,
    path = "/weather/{lat}/{lon}",
    params(
        ("lat" = f64, Path, description = "Latitude"),
        ("lon" = f64, Path, description = "Longitude"),
        ("exclude" = Option<String>, Query, description = "Forecast parts to leave out, comma separated"),
        ("units" = Option<String>, Query, description = "standard, metric or imperial")
    ),
    responses(
        (status = 200, description = "Forecast bundle exactly as returned by the weather service"),
        (status = 500, description = "Lookup failed or coordinates are not numbers; body is the text `Error`")
    ),
    tag = "weather"
)]
pub async fn detailed_by_coordinates(
    State(state): State<AppState>,
    coordinates: Result<Path<(f64, f64)>, PathRejection>,
    params: Result<Query<ForecastParams>, QueryRejection>,
) -> Result<Json<Value>, WeatherFailure> {
    let Path((latitude, longitude)) =
        coordinates.map_err(|rejection| AppError::unusable(rejection.body_text()))?;
    let Query(params) = params.map_err(|rejection| AppError::unusable(rejection.body_text()))?;

    info!(lat = latitude, lon = longitude, "Forecast request received");

    let request = ForecastRequest {
        latitude,
        longitude,
        exclude: params.exclude,
        units: params.units,
    };
    let forecast = state.weather.forecast_bundle(&request).await?;

    Ok(Json(forecast))
}
