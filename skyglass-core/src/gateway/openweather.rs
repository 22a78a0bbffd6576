use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::{
    error::ErrorKind,
    model::{Coordinates, CurrentConditions, ForecastDay},
    normalize::{normalize_current, normalize_forecast},
};

use super::WeatherGateway;

const STATUS_OK: i64 = 200;
const STATUS_NOT_FOUND: i64 = 404;

#[derive(Debug, Clone)]
pub struct OpenWeatherGateway {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherGateway {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http,
        })
    }

    /// Issue one GET and return the payload once the provider reports success.
    async fn get(&self, endpoint: &str, location: &[(&str, String)]) -> Result<Value, ErrorKind> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut query: Vec<(&str, &str)> = location.iter().map(|(k, v)| (*k, v.as_str())).collect();
        query.push(("appid", self.api_key.as_str()));
        query.push(("units", "metric"));

        let res = self.http.get(&url).query(&query).send().await.map_err(|err| {
            tracing::debug!("OpenWeather {endpoint} request failed: {err}");
            ErrorKind::NetworkFailure
        })?;

        let http_status = res.status();
        let body = res.text().await.map_err(|err| {
            tracing::debug!("Failed to read OpenWeather {endpoint} body: {err}");
            ErrorKind::NetworkFailure
        })?;

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(_) if !http_status.is_success() => {
                tracing::debug!(
                    "OpenWeather {endpoint} failed with status {http_status}: {}",
                    truncate_body(&body)
                );
                return Err(ErrorKind::NetworkFailure);
            }
            Err(err) => {
                tracing::debug!("OpenWeather {endpoint} body is not JSON: {err}");
                return Err(ErrorKind::MalformedResponse);
            }
        };

        match provider_status(&payload) {
            Some(STATUS_OK) => Ok(payload),
            Some(STATUS_NOT_FOUND) => Err(ErrorKind::LocationNotFound),
            Some(code) => {
                tracing::debug!(
                    "OpenWeather {endpoint} reported status {code}: {}",
                    truncate_body(&body)
                );
                Err(ErrorKind::NetworkFailure)
            }
            None if http_status.is_success() => Err(ErrorKind::MalformedResponse),
            None => Err(ErrorKind::NetworkFailure),
        }
    }
}

/// The `cod` field arrives as a number on `/weather` and as a string on `/forecast`.
fn provider_status(payload: &Value) -> Option<i64> {
    match payload.get("cod")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherGateway {
    async fn fetch_current_by_name(&self, name: &str) -> Result<CurrentConditions, ErrorKind> {
        let payload = self.get("weather", &[("q", name.to_string())]).await?;
        normalize_current(payload)
    }

    async fn fetch_current_by_coords(
        &self,
        coords: Coordinates,
    ) -> Result<CurrentConditions, ErrorKind> {
        let location = [
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
        ];
        let payload = self.get("weather", &location).await?;
        normalize_current(payload)
    }

    async fn fetch_forecast_by_name(&self, name: &str) -> Result<Vec<ForecastDay>, ErrorKind> {
        let payload = self.get("forecast", &[("q", name.to_string())]).await?;
        normalize_forecast(payload)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> OpenWeatherGateway {
        OpenWeatherGateway::new(server.uri(), "TEST_KEY".into(), Duration::from_secs(5))
            .expect("client builds")
    }

    fn current_body(name: &str) -> Value {
        json!({
            "cod": 200,
            "name": name,
            "weather": [{ "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
            "main": { "temp": 11.3, "humidity": 71 },
            "wind": { "speed": 3.6 }
        })
    }

    #[tokio::test]
    async fn fetches_current_by_name_with_metric_units() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "london"))
            .and(query_param("appid", "TEST_KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
            .mount(&server)
            .await;

        let current = gateway(&server)
            .fetch_current_by_name("london")
            .await
            .expect("current conditions");

        assert_eq!(current.name, "London");
        assert_eq!(current.humidity_pct, 71);
    }

    #[tokio::test]
    async fn fetches_current_by_coords() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "48.85"))
            .and(query_param("lon", "2.35"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris")))
            .mount(&server)
            .await;

        let current = gateway(&server)
            .fetch_current_by_coords(Coordinates {
                latitude: 48.85,
                longitude: 2.35,
            })
            .await
            .expect("current conditions");

        assert_eq!(current.name, "Paris");
    }

    #[tokio::test]
    async fn coords_without_place_name_are_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("")))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .fetch_current_by_coords(Coordinates {
                latitude: -60.0,
                longitude: -30.0,
            })
            .await
            .unwrap_err();
        assert_eq!(err, ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn not_found_status_maps_to_location_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;

        let err = gateway(&server)
            .fetch_current_by_name("Atlantis")
            .await
            .unwrap_err();
        assert_eq!(err, ErrorKind::LocationNotFound);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_network_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "cod": 401, "message": "Invalid API key" })),
            )
            .mount(&server)
            .await;

        let err = gateway(&server)
            .fetch_current_by_name("London")
            .await
            .unwrap_err();
        assert_eq!(err, ErrorKind::NetworkFailure);
    }

    #[tokio::test]
    async fn non_json_success_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .fetch_current_by_name("London")
            .await
            .unwrap_err();
        assert_eq!(err, ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn non_json_error_is_network_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .fetch_current_by_name("London")
            .await
            .unwrap_err();
        assert_eq!(err, ErrorKind::NetworkFailure);
    }

    #[tokio::test]
    async fn missing_fields_are_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cod": 200 })))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .fetch_current_by_name("London")
            .await
            .unwrap_err();
        assert_eq!(err, ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn forecast_accepts_string_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "London"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": "200",
                "list": [
                    {
                        "dt_txt": "2024-05-01 12:00:00",
                        "weather": [{ "main": "Rain", "icon": "10d" }],
                        "main": { "temp": 9.5 }
                    },
                    {
                        "dt_txt": "2024-05-01 15:00:00",
                        "weather": [{ "main": "Rain", "icon": "10d" }],
                        "main": { "temp": 10.1 }
                    }
                ]
            })))
            .mount(&server)
            .await;

        let days = gateway(&server)
            .fetch_forecast_by_name("London")
            .await
            .expect("forecast");

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].icon, "10d");
    }

    #[tokio::test]
    async fn unreachable_provider_is_network_failure() {
        let gw = OpenWeatherGateway::new(
            "http://127.0.0.1:1".into(),
            "TEST_KEY".into(),
            Duration::from_secs(2),
        )
        .expect("client builds");

        let err = gw.fetch_current_by_name("London").await.unwrap_err();
        assert_eq!(err, ErrorKind::NetworkFailure);
    }

    #[test]
    fn provider_status_reads_numbers_and_strings() {
        assert_eq!(provider_status(&json!({ "cod": 200 })), Some(200));
        assert_eq!(provider_status(&json!({ "cod": "404" })), Some(404));
        assert_eq!(provider_status(&json!({ "name": "x" })), None);
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        assert_eq!(truncate_body(&long).len(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
