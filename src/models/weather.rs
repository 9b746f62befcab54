//! Weather samples and forecast collections
//!
//! All temperatures stored here are Celsius; conversion to the display unit
//! happens when readings are built for evaluation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::{Location, TemperatureUnit};

/// Current-hour observation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentSample {
    /// Local time of the observation
    pub time: NaiveDateTime,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub relative_humidity: f64,
}

/// One hourly forecast point
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlySample {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub relative_humidity: f64,
}

/// One day of the multi-day forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailySample {
    pub date: NaiveDate,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub humidity_max: f64,
    pub humidity_min: f64,
    /// Highest precipitation probability of the day (0-100)
    pub precipitation_probability_max: f64,
}

impl DailySample {
    /// Copy of this sample with temperatures expressed in `unit`
    #[must_use]
    pub fn in_unit(&self, unit: TemperatureUnit) -> Self {
        Self {
            max_temperature: unit.from_celsius(self.max_temperature),
            min_temperature: unit.from_celsius(self.min_temperature),
            ..self.clone()
        }
    }
}

/// Weather forecast for one location
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherForecast {
    /// Location for this forecast
    pub location: Location,
    /// IANA timezone the sample times are expressed in
    pub timezone: String,
    /// Current conditions, if the provider returned them
    pub current: Option<CurrentSample>,
    /// Hourly samples sorted by time
    pub hourly: Vec<HourlySample>,
    /// Daily samples sorted by date
    pub daily: Vec<DailySample>,
    /// When this forecast was retrieved
    pub retrieved_at: DateTime<Utc>,
}

impl WeatherForecast {
    /// Hourly samples starting at the current hour, at most `limit` of them
    #[must_use]
    pub fn upcoming_hours(&self, limit: usize) -> Vec<&HourlySample> {
        let start = self
            .current
            .as_ref()
            .and_then(|current| current.time.with_minute(0))
            .and_then(|time| time.with_second(0));

        self.hourly
            .iter()
            .filter(|sample| start.is_none_or(|start| sample.time >= start))
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn forecast_with_hours(current: Option<NaiveDateTime>) -> WeatherForecast {
        WeatherForecast {
            location: Location::new(39.64, -106.37, "Vail".to_string()),
            timezone: "America/Denver".to_string(),
            current: current.map(|time| CurrentSample {
                time,
                temperature: -5.0,
                relative_humidity: 60.0,
            }),
            hourly: (0..24)
                .map(|hour| HourlySample {
                    time: at(hour, 0),
                    temperature: -5.0,
                    relative_humidity: 60.0,
                })
                .collect(),
            daily: Vec::new(),
            retrieved_at: Utc::now(),
        }
    }

    #[test]
    fn test_upcoming_hours_start_at_current_hour() {
        let forecast = forecast_with_hours(Some(at(9, 45)));
        let hours = forecast.upcoming_hours(12);
        assert_eq!(hours.len(), 12);
        assert_eq!(hours[0].time, at(9, 0));
        assert_eq!(hours[11].time, at(20, 0));
    }

    #[test]
    fn test_upcoming_hours_truncated_at_end_of_series() {
        let forecast = forecast_with_hours(Some(at(20, 15)));
        assert_eq!(forecast.upcoming_hours(12).len(), 4);
    }

    #[test]
    fn test_upcoming_hours_without_current_uses_series_start() {
        let forecast = forecast_with_hours(None);
        let hours = forecast.upcoming_hours(3);
        assert_eq!(hours[0].time, at(0, 0));
        assert_eq!(hours.len(), 3);
    }

    #[test]
    fn test_daily_sample_in_fahrenheit() {
        let sample = DailySample {
            date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            max_temperature: 10.0,
            min_temperature: -10.0,
            humidity_max: 90.0,
            humidity_min: 40.0,
            precipitation_probability_max: 20.0,
        };
        let converted = sample.in_unit(TemperatureUnit::Fahrenheit);
        assert!((converted.max_temperature - 50.0).abs() < 1e-9);
        assert!((converted.min_temperature - 14.0).abs() < 1e-9);
        assert_eq!(converted.humidity_min, 40.0);
        assert_eq!(sample.in_unit(TemperatureUnit::Celsius), sample);
    }
}
