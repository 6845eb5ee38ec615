use std::{error::Error as _, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use weather_core::{AggregatedResult, WeatherError, WeatherQuery, WeatherService};

/// Shared handler state. `service` is `None` when no credential was configured.
#[derive(Debug, Clone)]
pub struct AppState {
    service: Option<Arc<WeatherService>>,
}

impl AppState {
    pub fn new(service: Option<Arc<WeatherService>>) -> Self {
        Self { service }
    }

    fn service(&self) -> Result<&WeatherService, WeatherError> {
        self.service.as_deref().ok_or(WeatherError::MissingCredential)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .with_state(state)
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<AggregatedResult>, ApiError> {
    let service = state.service()?;
    let query = WeatherQuery::new(first_city(params));

    let result = service.aggregate(&query).await?;
    Ok(Json(result))
}

/// First `city` value in the query string. Repeated keys are accepted.
fn first_city(params: Vec<(String, String)>) -> Option<String> {
    params.into_iter().find(|(key, _)| key == "city").map(|(_, value)| value)
}

/// Maps [`WeatherError`] onto a status code and `{ "message": ... }` body.
#[derive(Debug)]
pub struct ApiError(WeatherError);

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;

        if err.is_unexpected() {
            tracing::error!(error = %error_chain(&err), "failed to fetch weather data");
        } else if let WeatherError::CityNotFound { city } = &err {
            tracing::info!(%city, "city not found");
        } else {
            tracing::warn!(error = %err, "rejecting weather request");
        }

        let body = ErrorResponse { message: err.to_string() };
        (err.status_code(), Json(body)).into_response()
    }
}

fn error_chain(err: &WeatherError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
