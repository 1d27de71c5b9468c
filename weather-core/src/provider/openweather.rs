use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, error, info};

use crate::{
    WeatherError,
    http::truncate_body,
    model::{WeatherReading, mps_to_kmh, round_half_up},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn fetch_current(&self, location: &str) -> Result<WeatherReading, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "imperial"),
            ])
            .send()
            .await
            .map_err(|e| {
                WeatherError::provider(format!(
                    "Failed to send request to OpenWeather (current weather): {e}"
                ))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::provider(format!(
                "Failed to read OpenWeather current response body: {e}"
            ))
        })?;

        debug!(%status, "OpenWeather responded");

        if !status.is_success() {
            return Err(classify_failure(status, location, &body));
        }

        parse_current(&body)
    }
}

/// Map a non-success status onto the lookup error taxonomy.
fn classify_failure(status: StatusCode, location: &str, body: &str) -> WeatherError {
    match status {
        StatusCode::NOT_FOUND => {
            error!("Location not found: {location}");
            info!(
                "Try using just the city name (e.g., \"Cincinnati\" instead of \"Cincinnati, OH\")"
            );
            WeatherError::LocationNotFound {
                location: location.to_string(),
            }
        }
        StatusCode::UNAUTHORIZED => {
            error!("Invalid API key for OpenWeatherMap");
            WeatherError::AuthenticationFailure
        }
        _ => {
            error!(%status, "Weather API error");
            WeatherError::provider(format!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(body),
            ))
        }
    }
}

fn parse_current(body: &str) -> Result<WeatherReading, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(|e| {
        WeatherError::provider(format!("Failed to parse OpenWeather current JSON: {e}"))
    })?;

    Ok(parsed.into_reading())
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_reading(self) -> WeatherReading {
        let location = match self.sys.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name,
        };

        let description = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_else(|| "Unknown".to_string());

        WeatherReading {
            location,
            temperature_f: round_half_up(self.main.temp),
            description,
            humidity_pct: self.main.humidity,
            wind_speed_kmh: mps_to_kmh(self.wind.speed),
            feels_like_f: round_half_up(self.main.feels_like),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, location: &str) -> Result<WeatherReading, WeatherError> {
        info!("Fetching weather data for: {location}");
        self.fetch_current(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKYO: &str = r#"{
        "coord": {"lon": 139.69, "lat": 35.69},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 71.6, "feels_like": 70.5, "temp_min": 69.0, "temp_max": 73.0, "pressure": 1015, "humidity": 45},
        "wind": {"speed": 5.0, "deg": 120},
        "dt": 1700000000,
        "sys": {"country": "JP", "sunrise": 1699996000, "sunset": 1700034000},
        "name": "Tokyo",
        "cod": 200
    }"#;

    #[test]
    fn parses_current_weather_with_conversions() {
        let reading = parse_current(TOKYO).expect("fixture should parse");

        assert_eq!(
            reading,
            WeatherReading {
                location: "Tokyo, JP".into(),
                temperature_f: 72,
                description: "clear sky".into(),
                humidity_pct: 45,
                wind_speed_kmh: 18,
                feels_like_f: 71,
            }
        );
    }

    #[test]
    fn missing_country_and_conditions_fall_back() {
        let body = r#"{
            "weather": [],
            "main": {"temp": 50.2, "feels_like": 48.9, "humidity": 80},
            "wind": {"speed": 1.2},
            "name": "Nowhere"
        }"#;

        let reading = parse_current(body).unwrap();
        assert_eq!(reading.location, "Nowhere");
        assert_eq!(reading.description, "Unknown");
        assert_eq!(reading.temperature_f, 50);
        assert_eq!(reading.wind_speed_kmh, 4);
    }

    #[test]
    fn malformed_body_is_provider_error() {
        let err = parse_current("{\"cod\": 200}").unwrap_err();
        assert!(matches!(err, WeatherError::ProviderError { .. }));
    }

    #[test]
    fn not_found_status_maps_to_location_not_found() {
        let err = classify_failure(
            StatusCode::NOT_FOUND,
            "Cincinnati, OH",
            r#"{"cod":"404","message":"city not found"}"#,
        );
        match err {
            WeatherError::LocationNotFound { location } => assert_eq!(location, "Cincinnati, OH"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unauthorized_status_maps_to_authentication_failure() {
        let err = classify_failure(StatusCode::UNAUTHORIZED, "Tokyo", r#"{"cod":401}"#);
        assert!(matches!(err, WeatherError::AuthenticationFailure));
    }

    #[test]
    fn other_status_is_provider_error_with_truncated_body() {
        let body = "x".repeat(500);
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "Tokyo", &body);

        let msg = err.to_string();
        assert!(matches!(err, WeatherError::ProviderError { .. }));
        assert!(msg.contains("500"));
        assert!(msg.ends_with("..."));
        assert!(msg.len() < 320);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url("http://example.test/");
        assert_eq!(provider.base_url, "http://example.test");
    }

    #[tokio::test]
    async fn unreachable_host_is_provider_error() {
        let provider =
            OpenWeatherProvider::new("KEY".into()).with_base_url("http://127.0.0.1:1/data/2.5");

        let err = provider.current_weather("Tokyo").await.unwrap_err();
        assert!(matches!(err, WeatherError::ProviderError { .. }));
    }

    const SAO_PAULO: &str = r#"{
        "weather": [{"description": "light rain"}],
        "main": {"temp": 71.6, "feels_like": -2.5, "humidity": 88},
        "wind": {"speed": 5.0},
        "sys": {"country": "BR"},
        "name": "São Paulo"
    }"#;

    /// Serve one canned response and hand back the request line it received.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/data/2.5", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (base_url, handle)
    }

    #[tokio::test]
    async fn fetches_current_weather_over_http() {
        let (base_url, server) = serve_once("200 OK", SAO_PAULO).await;
        let provider = OpenWeatherProvider::new("K".into()).with_base_url(&base_url);

        let reading = provider.current_weather("São Paulo").await.unwrap();

        assert_eq!(
            server.await.unwrap(),
            "GET /data/2.5/weather?q=S%C3%A3o+Paulo&appid=K&units=imperial HTTP/1.1"
        );
        assert_eq!(
            reading,
            WeatherReading {
                location: "São Paulo, BR".into(),
                temperature_f: 72,
                description: "light rain".into(),
                humidity_pct: 88,
                wind_speed_kmh: 18,
                feels_like_f: -2,
            }
        );
    }

    #[tokio::test]
    async fn http_not_found_is_location_not_found() {
        let (base_url, server) =
            serve_once("404 Not Found", r#"{"cod":"404","message":"city not found"}"#).await;
        let provider = OpenWeatherProvider::new("K".into()).with_base_url(&base_url);

        let err = provider.current_weather("São Paulo").await.unwrap_err();
        server.await.unwrap();

        match err {
            WeatherError::LocationNotFound { location } => assert_eq!(location, "São Paulo"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_unauthorized_is_authentication_failure() {
        let (base_url, server) = serve_once(
            "401 Unauthorized",
            r#"{"cod":401,"message":"Invalid API key"}"#,
        )
        .await;
        let provider = OpenWeatherProvider::new("BAD".into()).with_base_url(&base_url);

        let err = provider.current_weather("Tokyo").await.unwrap_err();

        assert!(server.await.unwrap().contains("appid=BAD"));
        assert!(matches!(err, WeatherError::AuthenticationFailure));
    }

    #[tokio::test]
    async fn http_server_error_is_provider_error() {
        let (base_url, server) =
            serve_once("503 Service Unavailable", r#"{"cod":503}"#).await;
        let provider = OpenWeatherProvider::new("K".into()).with_base_url(&base_url);

        let err = provider.current_weather("Tokyo").await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, WeatherError::ProviderError { .. }));
        assert!(err.to_string().contains("503"));
    }
}
