use reqwest::StatusCode;
use thiserror::Error;

use crate::provider::Endpoint;

/// Everything that can go wrong while answering one weather query.
///
/// The `Display` text of each variant is the message shown to API callers;
/// internal detail lives in [`UpstreamError`] and is only logged.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No OpenWeather credential was configured. Needs an operator fix.
    #[error("Missing OPENWEATHER_KEY")]
    MissingCredential,

    /// The weather provider could not resolve the requested city.
    #[error("City not found")]
    CityNotFound { city: String },

    /// Any other upstream failure.
    #[error("Error fetching weather data")]
    Upstream(#[from] UpstreamError),
}

impl WeatherError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WeatherError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
            WeatherError::CityNotFound { .. } => StatusCode::NOT_FOUND,
            WeatherError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures the caller cannot fix by changing their input.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, WeatherError::Upstream(_))
    }
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to OpenWeather {endpoint} endpoint failed")]
    Request {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} endpoint timed out")]
    Timeout { endpoint: Endpoint },

    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse OpenWeather {endpoint} JSON")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("OpenWeather {endpoint} response contained no `{field}` entries")]
    Empty {
        endpoint: Endpoint,
        field: &'static str,
    },
}

impl UpstreamError {
    pub(crate) fn from_reqwest(endpoint: Endpoint, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            UpstreamError::Timeout { endpoint }
        } else {
            UpstreamError::Request { endpoint, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_messages_match_api_contract() {
        assert_eq!(WeatherError::MissingCredential.to_string(), "Missing OPENWEATHER_KEY");
        assert_eq!(
            WeatherError::CityNotFound { city: "Atlantis".into() }.to_string(),
            "City not found"
        );

        let err = WeatherError::from(UpstreamError::Empty {
            endpoint: Endpoint::AirPollution,
            field: "list",
        });
        assert_eq!(err.to_string(), "Error fetching weather data");
    }

    #[test]
    fn status_codes_are_fixed_per_variant() {
        assert_eq!(WeatherError::MissingCredential.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            WeatherError::CityNotFound { city: "x".into() }.status_code(),
            StatusCode::NOT_FOUND
        );

        let err = WeatherError::from(UpstreamError::Timeout { endpoint: Endpoint::Weather });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_unexpected());
        assert!(!WeatherError::MissingCredential.is_unexpected());
    }

    #[test]
    fn upstream_detail_stays_out_of_public_message() {
        let err = WeatherError::from(UpstreamError::Status {
            endpoint: Endpoint::AirPollution,
            status: StatusCode::BAD_GATEWAY,
            body: "secret upstream detail".into(),
        });

        assert!(!err.to_string().contains("secret"));

        let source = std::error::Error::source(&err).expect("upstream source");
        assert!(source.to_string().contains("502"));
        assert!(source.to_string().contains("air_pollution"));
    }
}
