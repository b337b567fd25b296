//! # OpenWeather Client
//!
//! Fetches the current weather for fixed coordinates from the OpenWeather
//! "current weather" API, metric units with Japanese descriptions.

use serde::Deserialize;
use std::time::Duration;

pub const OPEN_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub temp: f64,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainSection,
    weather: Vec<WeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct MainSection {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherEntry {
    description: String,
}

#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, String> {
        Self::with_base_url(api_key, OPEN_WEATHER_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub async fn current(&self, location: &Location) -> Result<Conditions, String> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lon.to_string()),
                ("units", "metric".to_string()),
                ("appid", self.api_key.clone()),
                ("lang", "ja".to_string()),
            ])
            .send()
            .await
            .map_err(|e| format!("{}: request failed: {}", location.name, e))?;

        if !resp.status().is_success() {
            return Err(format!(
                "{}: データ取得に失敗しました（ステータスコード: {}）",
                location.name,
                resp.status().as_u16()
            ));
        }

        let body: WeatherResponse = resp
            .json()
            .await
            .map_err(|e| format!("{}: invalid response: {}", location.name, e))?;

        let description = body
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| format!("{}: response has no weather entry", location.name))?;

        tracing::info!("{}: {}°C, {}", location.name, body.main.temp, description);
        Ok(Conditions {
            temp: body.main.temp,
            description,
        })
    }
}
