//! Core library for the weather aggregation relay.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the weather and air pollution providers
//! - Shared domain models (queries, observations, the merged result)
//! - The aggregation service and its error type
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;

pub use config::Config;
pub use error::{UpstreamError, WeatherError};
pub use model::{AggregatedResult, PollutionObservation, WeatherObservation, WeatherQuery};
pub use provider::{PollutionProvider, WeatherProvider, build_http_client};
pub use service::WeatherService;
