use common::errors::AppError;
use common::http_client::{HttpClient, encode_query};
use serde_json::Value;
use tracing::{info, instrument};

const AUTOCOMPLETE_LIMIT: u32 = 5;
const PLACE_TYPE: &str = "city";
const COUNTRY_FILTER: &str = "countrycode:us,ca";

/// How a forward search is shaped upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchShape {
    /// Rank candidates by distance to the point, no result limit.
    Proximity { latitude: f64, longitude: f64 },
    /// Plain autocomplete capped at five results.
    Plain,
}

/// Free-text place search, optionally biased towards a point
#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteRequest {
    pub text: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AutocompleteRequest {
    /// Bias needs both coordinates; a lone latitude or longitude is ignored.
    pub fn shape(&self) -> SearchShape {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => SearchShape::Proximity {
                latitude,
                longitude,
            },
            _ => SearchShape::Plain,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("text", self.text.clone()),
            ("type", PLACE_TYPE.to_string()),
            ("filter", COUNTRY_FILTER.to_string()),
        ];

        match self.shape() {
            SearchShape::Proximity {
                latitude,
                longitude,
            } => pairs.push(("bias", format!("proximity:{},{}", longitude, latitude))),
            SearchShape::Plain => pairs.push(("limit", AUTOCOMPLETE_LIMIT.to_string())),
        }

        pairs
    }
}

/// Geoapify geocoding client
pub struct GeoapifyClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl GeoapifyClient {
    pub fn new(http_client: HttpClient, base_url: String, api_key: String) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    #[instrument(skip(self), fields(text = %request.text, shape = ?request.shape()))]
    pub async fn autocomplete(&self, request: &AutocompleteRequest) -> Result<Value, AppError> {
        info!("Searching places");
        self.http_client.get_json(&self.autocomplete_url(request)).await
    }

    #[instrument(skip(self))]
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Value, AppError> {
        info!("Reverse geocoding");
        self.http_client
            .get_json(&self.reverse_url(latitude, longitude))
            .await
    }

    fn autocomplete_url(&self, request: &AutocompleteRequest) -> String {
        let mut pairs = request.query_pairs();
        pairs.push(("apiKey", self.api_key.clone()));
        format!(
            "{}/v1/geocode/autocomplete?{}",
            self.base_url,
            encode_query(&pairs)
        )
    }

    fn reverse_url(&self, latitude: f64, longitude: f64) -> String {
        let pairs = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("format", "json".to_string()),
            ("apiKey", self.api_key.clone()),
        ];
        format!("{}/v1/geocode/reverse?{}", self.base_url, encode_query(&pairs))
    }
}
