//! Temperature display unit and conversions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::SnowcastError;

/// Temperature scale the user has selected for displayed values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a value expressed in this unit to Celsius
    #[must_use]
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            Self::Celsius => value,
            Self::Fahrenheit => fahrenheit_to_celsius(value),
        }
    }

    /// Convert a Celsius value into this unit
    #[must_use]
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    /// Convert a Fahrenheit value into this unit
    #[must_use]
    pub fn from_fahrenheit(self, fahrenheit: f64) -> f64 {
        match self {
            Self::Celsius => fahrenheit_to_celsius(fahrenheit),
            Self::Fahrenheit => fahrenheit,
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Format a temperature with one decimal and the unit symbol
    #[must_use]
    pub fn format(self, value: f64) -> String {
        format!("{value:.1} {}", self.symbol())
    }
}

#[must_use]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius => write!(f, "celsius"),
            Self::Fahrenheit => write!(f, "fahrenheit"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = SnowcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(Self::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(Self::Fahrenheit),
            other => Err(SnowcastError::validation(format!(
                "Unknown temperature unit '{other}'. Use celsius or fahrenheit."
            ))),
        }
    }
}
