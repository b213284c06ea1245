use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::WeatherRecord;

use super::{FetchError, WeatherFetcher, kelvin_to_celsius};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Current-weather client for OpenWeatherMap.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        let url = format!("{}/weather", self.base_url);
        debug!(url = %url, "Fetching current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(format!("request failed: {e}")))?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Provider does not know this city");
            return Err(FetchError::NotFound);
        }

        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Unavailable(format!("failed to read body: {e}")))?;

        if status != StatusCode::OK {
            return Err(FetchError::Unavailable(format!(
                "status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_current(&body)
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(FetchError::EmptyInput);
        }

        let result = self.fetch_current(city).await;
        if let Err(FetchError::Unavailable(detail)) = &result {
            warn!(%detail, "Weather data could not be retrieved");
        }
        result
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lon: f64,
    lat: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    sys: OwSys,
    dt: i64,
}

fn parse_current(body: &str) -> Result<WeatherRecord, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Unavailable(format!("malformed response: {e}")))?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Unavailable("response has no weather entry".into()))?;

    let condition_code = weather
        .icon
        .get(..2)
        .ok_or_else(|| FetchError::Unavailable(format!("unusable icon '{}'", weather.icon)))?
        .to_string();

    Ok(WeatherRecord {
        temperature: kelvin_to_celsius(parsed.main.temp),
        longitude: parsed.coord.lon,
        latitude: parsed.coord.lat,
        condition_code,
        description: weather.description,
        sunrise_epoch: parsed.sys.sunrise,
        sunset_epoch: parsed.sys.sunset,
        observation_epoch: parsed.dt,
    })
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

    const LONDON: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10n"}],
        "main": {"temp": 285.15, "feels_like": 284.6, "humidity": 81},
        "dt": 1500,
        "sys": {"country": "GB", "sunrise": 1000, "sunset": 2000},
        "name": "London",
        "cod": 200
    }"#;

    #[test]
    fn parse_current_normalizes_fields() {
        let record = parse_current(LONDON).expect("valid body");

        assert!((record.temperature - 12.0).abs() < 1e-9);
        assert_eq!(record.condition_code, "10");
        assert_eq!(record.description, "light rain");
        assert_eq!(record.longitude, -0.1257);
        assert_eq!(record.latitude, 51.5085);
        assert_eq!(record.sunrise_epoch, 1000);
        assert_eq!(record.sunset_epoch, 2000);
        assert_eq!(record.observation_epoch, 1500);
    }

    #[test]
    fn parse_current_uses_first_weather_entry() {
        let body = LONDON.replace(
            r#""weather": [{"#,
            r#""weather": [{"icon": "01d", "description": "clear sky"}, {"#,
        );
        let record = parse_current(&body).expect("valid body");
        assert_eq!(record.condition_code, "01");
        assert_eq!(record.description, "clear sky");
    }

    #[test]
    fn parse_current_rejects_missing_fields() {
        let err = parse_current(r#"{"coord": {"lon": 1.0, "lat": 2.0}}"#).unwrap_err();
        assert!(matches!(err, FetchError::Unavailable(_)));
    }

    #[test]
    fn parse_current_rejects_empty_weather_list() {
        let body = r#"{
            "coord": {"lon": 1.0, "lat": 2.0},
            "weather": [],
            "main": {"temp": 280.0},
            "dt": 1, "sys": {"sunrise": 0, "sunset": 2}
        }"#;
        let err = parse_current(body).unwrap_err();
        assert_eq!(err, FetchError::Unavailable("response has no weather entry".into()));
    }

    #[test]
    fn parse_current_rejects_short_icon() {
        let body = LONDON.replace("\"10n\"", "\"1\"");
        assert!(matches!(parse_current(&body), Err(FetchError::Unavailable(_))));
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(300);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OpenWeatherClient::with_base_url("k".into(), "http://localhost:1/".into());
        assert_eq!(client.base_url(), "http://localhost:1");
        assert_eq!(OpenWeatherClient::new("k".into()).base_url(), DEFAULT_BASE_URL);
    }
}
