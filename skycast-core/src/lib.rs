//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over weather providers (OpenWeatherMap, NWS)
//! - Shared domain models (coordinates, conditions, forecasts, alerts)
//! - The fetch pipeline and the HTML presentation layer
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod alert;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod render;

pub use config::{Config, ProviderConfig};
pub use error::WeatherError;
pub use model::{
    AlertRecord, ConditionsSnapshot, Coordinate, ForecastBundle, ForecastPeriod, Location,
    WeatherReport,
};
pub use pipeline::fetch_report;
pub use provider::{ProviderId, WeatherProvider};
