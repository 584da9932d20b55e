//! Blocking HTTP client for the Weather Source OnPoint history and forecast APIs.

use crate::api::error::ApiError;
use crate::types::data_type::DataType;
use crate::types::date_range::DateRange;
use crate::types::location::Location;
use bon::bon;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;

const API_KEY_HEADER: &str = "X-API-KEY";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An undecoded provider response body and the URL that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub url: String,
    pub body: String,
}

impl RawResponse {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }
}

/// Source of raw weather responses for a point and date range.
///
/// [`WeatherSourceClient`] is the HTTP implementation; the pipeline only sees
/// this trait.
pub trait WeatherApi: Send + Sync {
    fn fetch(
        &self,
        location: &Location,
        date_range: &DateRange,
        data_type: DataType,
        fields: &[String],
    ) -> Result<RawResponse, ApiError>;
}

/// Issues one synchronous GET per [`WeatherApi::fetch`] call. No retries.
#[derive(Debug, Clone)]
pub struct WeatherSourceClient {
    client: Client,
    historical_base_url: String,
    forecast_base_url: String,
}

#[bon]
impl WeatherSourceClient {
    /// Creates a client authenticating with `api_key`.
    ///
    /// Base URLs default to the public Weather Source endpoints and the
    /// timeout to 30 seconds.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use weathersource_etl::WeatherSourceClient;
    /// use std::time::Duration;
    ///
    /// let client = WeatherSourceClient::builder()
    ///     .api_key("my-key")
    ///     .timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    /// ```
    #[builder]
    pub fn new(
        api_key: &str,
        historical_base_url: Option<String>,
        forecast_base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key).map_err(|_| ApiError::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            client,
            historical_base_url: historical_base_url
                .unwrap_or_else(|| DataType::Historical.default_base_url().to_string()),
            forecast_base_url: forecast_base_url
                .unwrap_or_else(|| DataType::Forecast.default_base_url().to_string()),
        })
    }

    fn base_url(&self, data_type: DataType) -> &str {
        match data_type {
            DataType::Historical => &self.historical_base_url,
            DataType::Forecast => &self.forecast_base_url,
        }
    }

    /// Builds the request URL. Commas in the field list are left unencoded,
    /// which is how the provider expects the list.
    pub fn request_url(
        &self,
        location: &Location,
        date_range: &DateRange,
        data_type: DataType,
        fields: &[String],
    ) -> String {
        let (start, end) = date_range.rfc3339_bounds();
        let mut url = format!(
            "{}/points/{},{}/hours/{},{}",
            self.base_url(data_type).trim_end_matches('/'),
            location.latitude(),
            location.longitude(),
            start,
            end
        );
        if !fields.is_empty() {
            url.push_str("?fields=");
            url.push_str(&fields.join(","));
        }
        url
    }
}

impl WeatherApi for WeatherSourceClient {
    fn fetch(
        &self,
        location: &Location,
        date_range: &DateRange,
        data_type: DataType,
        fields: &[String],
    ) -> Result<RawResponse, ApiError> {
        let url = self.request_url(location, date_range, data_type, fields);
        info!("Requesting {} data from {}", data_type, url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ApiError::Transport {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        debug!("Response status {} for {}", status, url);
        let body = response.text().map_err(|e| ApiError::Transport {
            url: url.clone(),
            source: e,
        })?;

        if !status.is_success() {
            warn!("HTTP error {} for {}: {}", status, url, body);
            return Err(ApiError::Request {
                url,
                status,
                message: provider_message(&body),
            });
        }

        debug!("Received {} bytes from {}", body.len(), url);
        Ok(RawResponse::new(url, body))
    }
}

/// The provider's `message` property when the error body is JSON, else the body.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_location, StubServer};
    use reqwest::StatusCode;

    fn range() -> DateRange {
        DateRange::parse("2023-12-01", "2023-12-07").unwrap()
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn client_for(server: &StubServer) -> WeatherSourceClient {
        WeatherSourceClient::builder()
            .api_key("test-api-key")
            .historical_base_url(server.base_url())
            .forecast_base_url(format!("{}/forecast/", server.base_url()))
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[test]
    fn builds_provider_url() {
        let client = WeatherSourceClient::builder().api_key("k").build().unwrap();
        let url = client.request_url(
            &test_location(),
            &range(),
            DataType::Historical,
            &fields(&["temp", "precip"]),
        );
        assert_eq!(
            url,
            "https://history.weathersourceapis.com/v2/points/40.7128,-74.006/hours/\
             2023-12-01T00:00:00+00:00,2023-12-07T23:00:00+00:00?fields=temp,precip"
        );
    }

    #[test]
    fn forecast_uses_forecast_endpoint() {
        let client = WeatherSourceClient::builder().api_key("k").build().unwrap();
        let url = client.request_url(&test_location(), &range(), DataType::Forecast, &fields(&["temp"]));
        assert!(url.starts_with("https://forecast.weathersourceapis.com/v2/points/"));
    }

    #[test]
    fn fetch_sends_key_and_returns_body() {
        let server = StubServer::respond(200, r#"{"history": []}"#);
        let client = client_for(&server);

        let raw = client
            .fetch(&test_location(), &range(), DataType::Historical, &fields(&["temp", "precip"]))
            .unwrap();
        assert_eq!(raw.body, r#"{"history": []}"#);

        let request = server.last_request().unwrap();
        assert!(request.starts_with(
            "GET /points/40.7128,-74.006/hours/2023-12-01T00:00:00+00:00,2023-12-07T23:00:00+00:00?fields=temp,precip HTTP/1.1"
        ));
        assert!(request.to_lowercase().contains("x-api-key: test-api-key"));
        assert!(request.to_lowercase().contains("accept: application/json"));
    }

    #[test]
    fn trailing_slash_in_base_url_is_ignored() {
        let server = StubServer::respond(200, r#"{"forecast": []}"#);
        let client = client_for(&server);
        client
            .fetch(&test_location(), &range(), DataType::Forecast, &fields(&["temp"]))
            .unwrap();
        assert!(server.last_request().unwrap().starts_with("GET /forecast/points/"));
    }

    #[test]
    fn error_status_carries_provider_message() {
        let server = StubServer::respond(400, r#"{"message": "Date range too large"}"#);
        let client = client_for(&server);

        let err = client
            .fetch(&test_location(), &range(), DataType::Historical, &fields(&["temp"]))
            .unwrap_err();
        match err {
            ApiError::Request { status, message, .. } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Date range too large");
            }
            other => panic!("expected request error, got {:?}", other),
        }
    }

    #[test]
    fn server_error_keeps_plain_body() {
        let server = StubServer::respond(500, "upstream exploded");
        let client = client_for(&server);

        let err = client
            .fetch(&test_location(), &range(), DataType::Historical, &fields(&["temp"]))
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let client = WeatherSourceClient::builder()
            .api_key("k")
            .historical_base_url(StubServer::unused_base_url())
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let err = client
            .fetch(&test_location(), &range(), DataType::Historical, &fields(&["temp"]))
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn provider_message_falls_back_to_body() {
        assert_eq!(provider_message(r#"{"message":"nope"}"#), "nope");
        assert_eq!(provider_message(r#"{"error":"nope"}"#), r#"{"error":"nope"}"#);
        assert_eq!(provider_message(" Bad gateway \n"), "Bad gateway");
    }
}
