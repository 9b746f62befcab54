//! Wet-bulb temperature estimation
//!
//! Uses Stull's (2011) empirical approximation, which takes air temperature in
//! Celsius and relative humidity as a percentage on the 0-100 scale.

use serde::{Deserialize, Serialize};

use crate::models::TemperatureUnit;
use crate::{Result, SnowcastError};

/// A temperature/humidity pair in a given display unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: f64,
    pub unit: TemperatureUnit,
}

/// Wet-bulb temperature in the unit of the reading it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WetBulbEstimate {
    pub value: f64,
    pub unit: TemperatureUnit,
}

impl Reading {
    #[must_use]
    pub fn new(temperature: f64, humidity: f64, unit: TemperatureUnit) -> Self {
        Self {
            temperature,
            humidity,
            unit,
        }
    }

    /// Estimate the wet-bulb temperature for this reading
    pub fn wet_bulb(&self) -> Result<WetBulbEstimate> {
        WetBulbEstimate::from_reading(self)
    }
}

impl WetBulbEstimate {
    pub fn from_reading(reading: &Reading) -> Result<Self> {
        let value = estimate_wet_bulb(reading.temperature, reading.humidity, reading.unit)?;
        Ok(Self {
            value,
            unit: reading.unit,
        })
    }
}

/// Estimate wet-bulb temperature, returned in the same unit as `temperature`.
///
/// Fails with [`SnowcastError::InvalidInput`] when the temperature is not finite
/// or the humidity is outside `[0, 100]`. Inputs are never clamped.
pub fn estimate_wet_bulb(temperature: f64, humidity: f64, unit: TemperatureUnit) -> Result<f64> {
    if !temperature.is_finite() {
        return Err(SnowcastError::invalid_input(format!(
            "temperature must be a finite number, got {temperature}"
        )));
    }
    if !humidity.is_finite() || !(0.0..=100.0).contains(&humidity) {
        return Err(SnowcastError::invalid_input(format!(
            "humidity must be between 0 and 100, got {humidity}"
        )));
    }

    let celsius = unit.to_celsius(temperature);
    Ok(unit.from_celsius(stull_wet_bulb(celsius, humidity)))
}

fn stull_wet_bulb(t: f64, h: f64) -> f64 {
    t * (0.151_977 * (h + 8.313_659).sqrt()).atan() + (t + h).atan() - (h - 1.676_331).atan()
        + 0.003_918_38 * h.powf(1.5) * (0.023_101 * h).atan()
        - 4.686_035
}
