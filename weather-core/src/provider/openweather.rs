use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::{UpstreamError, WeatherError},
    model::{Coordinates, PollutionObservation, WeatherObservation},
};

use super::{Endpoint, PollutionProvider, WeatherProvider};

/// Client for the OpenWeather current weather and air pollution endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, http: Client) -> Self {
        Self { api_key, base_url, http }
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint.path())
    }

    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<(StatusCode, String), UpstreamError> {
        let res = self
            .http
            .get(self.url(endpoint))
            .query(query)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(endpoint, e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| UpstreamError::from_reqwest(endpoint, e))?;

        Ok((status, body))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherObservation, WeatherError> {
        let endpoint = Endpoint::Weather;
        let (status, body) = self
            .fetch(
                endpoint,
                &[
                    ("q", city.to_owned()),
                    ("units", "metric".to_owned()),
                    ("appid", self.api_key.clone()),
                ],
            )
            .await?;

        if !status.is_success() {
            tracing::debug!(%city, %status, body = %truncate_body(&body), "weather lookup rejected");
            return Err(WeatherError::CityNotFound { city: city.to_owned() });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|source| UpstreamError::Decode { endpoint, source })?;

        let condition = parsed
            .weather
            .into_iter()
            .next()
            .ok_or(UpstreamError::Empty { endpoint, field: "weather" })?;

        Ok(WeatherObservation {
            coord: Coordinates { lat: parsed.coord.lat, lon: parsed.coord.lon },
            temperature_c: parsed.main.temp,
            description: condition.description,
            icon: condition.icon,
            observed_at: parsed.dt.and_then(unix_to_utc),
        })
    }
}

#[async_trait]
impl PollutionProvider for OpenWeatherProvider {
    async fn air_pollution(&self, coord: Coordinates) -> Result<PollutionObservation, WeatherError> {
        let endpoint = Endpoint::AirPollution;
        let (status, body) = self
            .fetch(
                endpoint,
                &[
                    ("lat", coord.lat.to_string()),
                    ("lon", coord.lon.to_string()),
                    ("appid", self.api_key.clone()),
                ],
            )
            .await?;

        if !status.is_success() {
            return Err(UpstreamError::Status { endpoint, status, body: truncate_body(&body) }.into());
        }

        let parsed: OwPollutionResponse = serde_json::from_str(&body)
            .map_err(|source| UpstreamError::Decode { endpoint, source })?;

        let entry = parsed
            .list
            .into_iter()
            .next()
            .ok_or(UpstreamError::Empty { endpoint, field: "list" })?;

        Ok(PollutionObservation {
            aqi: entry.main.aqi,
            pm2_5: entry.components.pm2_5,
            pm10: entry.components.pm10,
            measured_at: entry.dt.and_then(unix_to_utc),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    dt: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwAqi {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OwComponents {
    pm2_5: f64,
    pm10: f64,
}

#[derive(Debug, Deserialize)]
struct OwPollutionEntry {
    dt: Option<i64>,
    main: OwAqi,
    components: OwComponents,
}

#[derive(Debug, Deserialize)]
struct OwPollutionResponse {
    list: Vec<OwPollutionEntry>,
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
