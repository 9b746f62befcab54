//! Data models for the Snowcast application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and metadata
//! - Unit: Display temperature unit and conversions
//! - Weather: Current, hourly and daily samples plus the forecast collection

pub mod location;
pub mod unit;
pub mod weather;

// Re-export all public types for convenient access
pub use location::Location;
pub use unit::TemperatureUnit;
pub use weather::{CurrentSample, DailySample, HourlySample, WeatherForecast};
