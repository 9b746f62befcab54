//! Snow-quality classification from wet-bulb temperature

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::TemperatureUnit;

/// Wet-bulb temperature below which snowmaking is excellent, in °F
pub const EXCELLENT_THRESHOLD_F: f64 = 21.0;
/// Wet-bulb temperature at or above which it is too warm to make snow, in °F
pub const GOOD_THRESHOLD_F: f64 = 28.0;

/// Band boundaries expressed in one display unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub excellent: f64,
    pub good: f64,
    pub unit: TemperatureUnit,
}

impl Thresholds {
    /// Thresholds converted from their canonical Fahrenheit values
    #[must_use]
    pub fn for_unit(unit: TemperatureUnit) -> Self {
        Self {
            excellent: unit.from_fahrenheit(EXCELLENT_THRESHOLD_F),
            good: unit.from_fahrenheit(GOOD_THRESHOLD_F),
            unit,
        }
    }

    #[must_use]
    pub fn classify(&self, wet_bulb: f64) -> QualityBand {
        if wet_bulb < self.excellent {
            QualityBand::Excellent
        } else if wet_bulb < self.good {
            QualityBand::Marginal
        } else {
            QualityBand::TooWarm
        }
    }
}

/// Snowmaking quality, ordered from coldest to warmest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    Excellent,
    Marginal,
    TooWarm,
}

/// Border color hint used when rendering a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorHint {
    Blue,
    LightBlue,
    Red,
}

impl QualityBand {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Marginal => "Marginal",
            Self::TooWarm => "Too Warm",
        }
    }

    #[must_use]
    pub fn color(self) -> ColorHint {
        match self {
            Self::Excellent => ColorHint::Blue,
            Self::Marginal => ColorHint::LightBlue,
            Self::TooWarm => ColorHint::Red,
        }
    }

    /// Fill level of the quality gauge, in percent
    #[must_use]
    pub fn gauge_percentage(self) -> u8 {
        match self {
            Self::Excellent => 100,
            Self::Marginal => 70,
            Self::TooWarm => 30,
        }
    }

    /// Whether snow can be made at all in this band
    #[must_use]
    pub fn allows_snowmaking(self) -> bool {
        self != Self::TooWarm
    }
}

impl fmt::Display for QualityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ColorHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blue => "blue",
            Self::LightBlue => "lightblue",
            Self::Red => "red",
        })
    }
}

/// Classify a wet-bulb temperature given in `unit`
#[must_use]
pub fn classify(wet_bulb: f64, unit: TemperatureUnit) -> QualityBand {
    Thresholds::for_unit(unit).classify(wet_bulb)
}

#[must_use]
pub fn border_color(wet_bulb: f64, unit: TemperatureUnit) -> ColorHint {
    classify(wet_bulb, unit).color()
}
