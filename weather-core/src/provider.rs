use crate::{
    Config, WeatherError,
    model::{Coordinates, PollutionObservation, WeatherObservation},
};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Upstream endpoints the relay talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Weather,
    AirPollution,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Weather => "weather",
            Endpoint::AirPollution => "air_pollution",
        }
    }

    /// Path below the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Weather => "/data/2.5/weather",
            Endpoint::AirPollution => "/data/2.5/air_pollution",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a city to its coordinates and current conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fails with [`WeatherError::CityNotFound`] when the provider rejects the city.
    async fn current_weather(&self, city: &str) -> Result<WeatherObservation, WeatherError>;
}

/// Reports air quality at a coordinate pair.
#[async_trait]
pub trait PollutionProvider: Send + Sync + Debug {
    async fn air_pollution(&self, coord: Coordinates) -> Result<PollutionObservation, WeatherError>;
}

/// HTTP client shared by all outbound calls, with the configured timeouts applied.
pub fn build_http_client(config: &Config) -> reqwest::Result<Client> {
    let timeout = config.request_timeout();

    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(
    config: &Config,
    http: Client,
) -> Result<OpenWeatherProvider, WeatherError> {
    let api_key = config.api_key().ok_or(WeatherError::MissingCredential)?;

    Ok(OpenWeatherProvider::new(
        api_key.to_owned(),
        config.api_base_url.clone(),
        http,
    ))
}
