use common::errors::AppError;
use common::http_client::{HttpClient, encode_query};
use common::models::CurrentWeather;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}

/// Coordinate query for the full forecast bundle
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub exclude: Option<String>,
    pub units: Option<String>,
}

impl ForecastRequest {
    /// Absent `exclude`/`units` are left out rather than sent as placeholders.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("lat", self.latitude.to_string()),
            ("lon", self.longitude.to_string()),
        ];
        if let Some(exclude) = &self.exclude {
            pairs.push(("exclude", exclude.clone()));
        }
        if let Some(units) = &self.units {
            pairs.push(("units", units.clone()));
        }
        pairs
    }
}

/// OpenWeatherMap client
pub struct OpenWeatherClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(http_client: HttpClient, base_url: String, api_key: String) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    #[instrument(skip(self), fields(city = %city))]
    pub async fn current_by_city(&self, city: &str) -> Result<CurrentWeather, AppError> {
        info!(city = %city, "Fetching current weather");

        let response: OwCurrentResponse = self.http_client.get_json(&self.current_url(city)).await?;

        let description = response
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| AppError::unexpected_payload("weather conditions list is empty"))?;

        Ok(CurrentWeather {
            temperature: response.main.temp,
            description,
        })
    }

    #[instrument(skip(self), fields(lat = request.latitude, lon = request.longitude))]
    pub async fn forecast_bundle(&self, request: &ForecastRequest) -> Result<Value, AppError> {
        info!("Fetching forecast bundle");
        self.http_client.get_json(&self.forecast_url(request)).await
    }

    fn current_url(&self, city: &str) -> String {
        let pairs = [
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ];
        format!("{}/data/2.5/weather?{}", self.base_url, encode_query(&pairs))
    }

    fn forecast_url(&self, request: &ForecastRequest) -> String {
        let mut pairs = request.query_pairs();
        pairs.push(("appid", self.api_key.clone()));
        format!("{}/data/2.5/onecall?{}", self.base_url, encode_query(&pairs))
    }
}
