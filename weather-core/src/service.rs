//! The aggregation flow: weather lookup, then air quality at the returned
//! coordinates, merged into one [`AggregatedResult`].

use std::sync::Arc;

use reqwest::Client;

use crate::{
    Config, WeatherError,
    model::{AggregatedResult, WeatherQuery},
    provider::{PollutionProvider, WeatherProvider, provider_from_config},
};

#[derive(Debug, Clone)]
pub struct WeatherService {
    weather: Arc<dyn WeatherProvider>,
    pollution: Arc<dyn PollutionProvider>,
    icon_base_url: String,
}

impl WeatherService {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        pollution: Arc<dyn PollutionProvider>,
        icon_base_url: impl Into<String>,
    ) -> Self {
        Self { weather, pollution, icon_base_url: icon_base_url.into() }
    }

    /// Build a service backed by OpenWeather for both lookups.
    ///
    /// Fails with [`WeatherError::MissingCredential`] when no key is configured.
    pub fn from_config(config: &Config, http: Client) -> Result<Self, WeatherError> {
        let provider = Arc::new(provider_from_config(config, http)?);

        Ok(Self::new(provider.clone(), provider, config.icon_base_url.clone()))
    }

    /// Run both upstream lookups in order and merge the results.
    ///
    /// The pollution lookup is only attempted once the weather lookup has
    /// produced coordinates.
    pub async fn aggregate(&self, query: &WeatherQuery) -> Result<AggregatedResult, WeatherError> {
        let weather = self.weather.current_weather(&query.city).await?;
        tracing::debug!(
            city = %query.city,
            lat = weather.coord.lat,
            lon = weather.coord.lon,
            observed_at = ?weather.observed_at,
            "resolved current weather"
        );

        let pollution = self.pollution.air_pollution(weather.coord).await?;
        tracing::debug!(
            city = %query.city,
            aqi = pollution.aqi,
            measured_at = ?pollution.measured_at,
            "resolved air quality"
        );

        Ok(AggregatedResult::assemble(query, weather, pollution, &self.icon_base_url))
    }
}
