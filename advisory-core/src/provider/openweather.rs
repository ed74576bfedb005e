use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::model::{Coordinates, LocationLabel, WeatherObservation};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Weather icon image for an OpenWeather icon code such as "10d".
pub fn icon_url(code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{code}@4x.png")
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    /// Point at another host, e.g. a proxy or a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;
        Ok(self)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        path: &str,
        at: Coordinates,
        extra: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .query(extra)
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        debug!(%status, what, "OpenWeather responded");

        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(anyhow!(
                "OpenWeather rejected the API key (401).\n\
                 Hint: run `weather-advisory configure` and enter a valid key."
            ));
        }

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }

    async fn fetch_current(&self, at: Coordinates) -> Result<OwCurrentResponse> {
        self.get_json("current weather", "/data/2.5/weather", at, &[("units", "metric")]).await
    }

    /// Place name for `at`, or `None` when the lookup has no match.
    pub async fn reverse_geocode(&self, at: Coordinates) -> Result<Option<LocationLabel>> {
        let places: Vec<OwPlace> =
            self.get_json("reverse geocoding", "/geo/1.0/reverse", at, &[("limit", "1")]).await?;

        Ok(places.into_iter().next().map(|p| LocationLabel {
            name: p.name,
            region: p.state,
            country: p.country,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    sys: Option<OwSys>,
}

#[derive(Debug, Deserialize)]
struct OwPlace {
    name: String,
    state: Option<String>,
    country: Option<String>,
}

impl OwCurrentResponse {
    fn fallback_label(&self) -> Option<LocationLabel> {
        if self.name.is_empty() {
            return None;
        }

        Some(LocationLabel {
            name: self.name.clone(),
            region: None,
            country: self.sys.as_ref().and_then(|s| s.country.clone()),
        })
    }

    fn into_observation(self, location: Option<LocationLabel>) -> WeatherObservation {
        let primary = self.weather.into_iter().next();

        // The short group ("Rain", "Clouds", ...) drives classification.
        let condition = primary
            .as_ref()
            .map(|w| w.main.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        WeatherObservation {
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            temperature_min_c: self.main.temp_min,
            temperature_max_c: self.main.temp_max,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.and_then(|w| w.speed),
            condition,
            description: primary.as_ref().and_then(|w| w.description.clone()),
            icon_code: primary.and_then(|w| w.icon),
            location,
            observed_at: self.dt.and_then(unix_to_utc),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_observation(&self, at: Coordinates) -> Result<WeatherObservation> {
        let current = self.fetch_current(at).await?;

        let location = match self.reverse_geocode(at).await {
            Ok(Some(label)) => Some(label),
            Ok(None) => current.fallback_label(),
            Err(err) => {
                warn!(error = %err, "reverse geocoding failed, using weather station name");
                current.fallback_label()
            }
        };

        Ok(current.into_observation(location))
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
