use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use common::errors::AppError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::info;

use super::api_client::AutocompleteRequest;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "optional_coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "optional_coordinate")]
    pub lon: Option<f64>,
}

/// `?lat=` counts as absent; anything else must parse as a number.
fn optional_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[utoipa::path(
    get,
    path = "/location/query/{query}",
    params(
        ("query" = String, Path, description = "Search text, used when `text` is not given"),
        ("text" = Option<String>, Query, description = "Text input for location search"),
        ("lat" = Option<f64>, Query, description = "Latitude to bias results towards (needs lon)"),
        ("lon" = Option<f64>, Query, description = "Longitude to bias results towards (needs lat)")
    ),
    responses(
        (status = 200, description = "Candidate places exactly as returned by the geocoding service"),
        (status = 500, description = "Geocoding service failure or malformed coordinates", body = common::errors::ErrorResponse)
    ),
    tag = "location"
)]
pub async fn search(
    State(state): State<AppState>,
    query: Result<Path<String>, PathRejection>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(query) = query.map_err(|rejection| AppError::unusable(rejection.body_text()))?;
    let Query(params) = params.map_err(|rejection| AppError::unusable(rejection.body_text()))?;

    let text = params
        .text
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(query);

    let request = AutocompleteRequest {
        text,
        latitude: params.lat,
        longitude: params.lon,
    };

    info!(text = %request.text, shape = ?request.shape(), "Location search received");

    let candidates = state.location.autocomplete(&request).await?;

    Ok(Json(candidates))
}

#[utoipa::path(
    get,
    path = "/location/coord/{lat}/{lon}",
    params(
        ("lat" = f64, Path, description = "The latitude of the location"),
        ("lon" = f64, Path, description = "The longitude of the location")
    ),
    responses(
        (status = 200, description = "Reverse geocoding data exactly as returned by the geocoding service"),
        (status = 500, description = "Geocoding service failure or coordinates are not numbers", body = common::errors::ErrorResponse)
    ),
    tag = "location"
)]
pub async fn reverse(
    State(state): State<AppState>,
    coordinates: Result<Path<(f64, f64)>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path((latitude, longitude)) =
        coordinates.map_err(|rejection| AppError::unusable(rejection.body_text()))?;

    info!(lat = latitude, lon = longitude, "Reverse geocode received");

    let address = state.location.reverse_geocode(latitude, longitude).await?;

    Ok(Json(address))
}
