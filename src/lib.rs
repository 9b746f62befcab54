//! Snowcast - snowmaking conditions advisor
//!
//! Estimates wet-bulb temperatures from forecast readings, classifies them
//! into snowmaking quality bands and attaches operational advisory notes.

pub mod advisor;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod snow;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use advisor::Advisor;
pub use cache::ForecastCache;
pub use config::SnowcastConfig;
pub use error::SnowcastError;
pub use location_resolver::{Geocoder, LocationInput, LocationResolver, OpenMeteoGeocoder};
pub use models::{Location, TemperatureUnit, WeatherForecast};
pub use snow::{ConditionsReport, QualityBand, Thresholds, estimate_wet_bulb};
pub use weather::{OpenMeteoClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SnowcastError>;
