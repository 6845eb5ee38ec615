use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// City used when the caller does not name one.
pub const DEFAULT_CITY: &str = "London";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    /// Build a query from an optional city parameter. Missing or blank
    /// values fall back to [`DEFAULT_CITY`].
    pub fn new(city: Option<String>) -> Self {
        let city = city
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CITY.to_string());

        Self { city }
    }
}

impl Default for WeatherQuery {
    fn default() -> Self {
        Self::new(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for a city, as reported by the weather endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub coord: Coordinates,
    pub temperature_c: f64,
    pub description: String,
    pub icon: String,
    pub observed_at: Option<DateTime<Utc>>,
}

/// Air quality at a coordinate pair, as reported by the pollution endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PollutionObservation {
    /// OpenWeather category, 1 (good) to 5 (very poor).
    pub aqi: u8,
    pub pm2_5: f64,
    pub pm10: f64,
    pub measured_at: Option<DateTime<Utc>>,
}

/// The merged payload returned by `GET /api/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub city: String,
    pub temp: f64,
    pub desc: String,
    #[serde(rename = "iconUrl")]
    pub icon_url: String,
    pub aqi: u8,
    pub pm25: f64,
    pub pm10: f64,
}

impl AggregatedResult {
    pub fn assemble(
        query: &WeatherQuery,
        weather: WeatherObservation,
        pollution: PollutionObservation,
        icon_base_url: &str,
    ) -> Self {
        Self {
            city: query.city.clone(),
            temp: weather.temperature_c,
            icon_url: icon_url(icon_base_url, &weather.icon),
            desc: weather.description,
            aqi: pollution.aqi,
            pm25: pollution.pm2_5,
            pm10: pollution.pm10,
        }
    }
}

/// `{base}/{icon}@2x.png`
pub fn icon_url(base: &str, icon: &str) -> String {
    format!("{}/{icon}@2x.png", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults_to_london() {
        assert_eq!(WeatherQuery::new(None).city, "London");
        assert_eq!(WeatherQuery::new(Some(String::new())).city, "London");
        assert_eq!(WeatherQuery::new(Some("   ".into())).city, "London");
        assert_eq!(WeatherQuery::default().city, "London");
    }

    #[test]
    fn query_keeps_given_city_verbatim() {
        assert_eq!(WeatherQuery::new(Some("São Paulo".into())).city, "São Paulo");
    }

    #[test]
    fn icon_url_uses_fixed_template() {
        let url = icon_url("https://openweathermap.org/img/wn", "01d");
        assert_eq!(url, "https://openweathermap.org/img/wn/01d@2x.png");

        let trailing = icon_url("https://openweathermap.org/img/wn/", "10n");
        assert_eq!(trailing, "https://openweathermap.org/img/wn/10n@2x.png");
    }

    #[test]
    fn aggregated_result_serializes_seven_fields() {
        let query = WeatherQuery::new(Some("Paris".into()));
        let weather = WeatherObservation {
            coord: Coordinates { lat: 48.85, lon: 2.35 },
            temperature_c: 17.5,
            description: "clear sky".into(),
            icon: "01d".into(),
            observed_at: None,
        };
        let pollution = PollutionObservation { aqi: 2, pm2_5: 4.1, pm10: 7.9, measured_at: None };

        let result =
            AggregatedResult::assemble(&query, weather, pollution, "https://openweathermap.org/img/wn");
        let json = serde_json::to_value(&result).unwrap();
        let obj = json.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["aqi", "city", "desc", "iconUrl", "pm10", "pm25", "temp"]);

        assert_eq!(obj["city"], "Paris");
        assert_eq!(obj["temp"], 17.5);
        assert_eq!(obj["desc"], "clear sky");
        assert!(obj["iconUrl"].as_str().unwrap().ends_with("01d@2x.png"));
        assert_eq!(obj["aqi"], 2);
        assert_eq!(obj["pm25"], 4.1);
        assert_eq!(obj["pm10"], 7.9);
    }
}
