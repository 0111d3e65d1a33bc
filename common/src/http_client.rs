use crate::errors::AppError;
use reqwest::{Client, RequestBuilder, header};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{info, instrument, warn};

const MAX_ERROR_BODY: usize = 512;

/// HTTP client for upstream calls: one attempt, bounded by a timeout
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, AppError> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Fetch JSON from URL
    #[instrument(skip_all, fields(endpoint = %endpoint(url)))]
    pub async fn get_json<T>(&self, url: &str) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        self.execute(url, self.client.get(url)).await
    }

    /// POST a JSON body, optionally with a bearer token
    #[instrument(skip_all, fields(endpoint = %endpoint(url)))]
    pub async fn post_json<B, T>(
        &self,
        url: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        self.execute(url, request).await
    }

    /// POST an `application/x-www-form-urlencoded` body
    #[instrument(skip_all, fields(endpoint = %endpoint(url)))]
    pub async fn post_form<T>(&self, url: &str, form: &[(&str, &str)]) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(encode_query(form));
        self.execute(url, request).await
    }

    async fn execute<T>(&self, url: &str, request: RequestBuilder) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let endpoint = endpoint(url);
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| AppError::timeout(format!("Request to {} timed out", endpoint)))?
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::timeout(format!("Request to {} timed out", endpoint))
                } else {
                    AppError::Network(e.without_url())
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(AppError::Network)?;

        if !status.is_success() {
            warn!(endpoint = %endpoint, status = status.as_u16(), "Upstream returned an error status");
            return Err(AppError::http(status.as_u16(), truncate_body(&text)));
        }

        let json: T = serde_json::from_str(&text)?;
        info!(endpoint = %endpoint, "Request successful");

        Ok(json)
    }
}

/// Percent-encode key/value pairs into `k=v&k=v` form.
pub fn encode_query<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The URL without its query string, which may carry API keys.
pub fn endpoint(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
