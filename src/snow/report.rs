//! Conditions report: every reading of a forecast run through the estimator
//! and classifier, ready to be serialized or printed.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::advisory::{self, AdvisoryNote};
use super::quality::{ColorHint, QualityBand, Thresholds};
use super::wet_bulb::Reading;
use crate::models::{DailySample, Location, TemperatureUnit, WeatherForecast};
use crate::{Result, SnowcastError};

/// Number of hourly samples shown by default
pub const DEFAULT_HOURLY_LIMIT: usize = 12;

/// Evaluation of a single temperature/humidity reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingAssessment {
    pub temperature: f64,
    pub humidity: f64,
    pub wet_bulb: f64,
    pub band: QualityBand,
    pub label: String,
    pub color: ColorHint,
    pub gauge_percentage: u8,
    /// How far the wet-bulb sits above the snowmaking limit, when too warm
    pub degrees_too_warm: Option<f64>,
}

impl ReadingAssessment {
    pub fn evaluate(reading: Reading) -> Result<Self> {
        let wet_bulb = reading.wet_bulb()?.value;
        let thresholds = Thresholds::for_unit(reading.unit);
        let band = thresholds.classify(wet_bulb);

        Ok(Self {
            temperature: reading.temperature,
            humidity: reading.humidity,
            wet_bulb,
            band,
            label: band.label().to_string(),
            color: band.color(),
            gauge_percentage: band.gauge_percentage(),
            degrees_too_warm: (!band.allows_snowmaking()).then(|| wet_bulb - thresholds.good),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyAssessment {
    pub time: NaiveDateTime,
    #[serde(flatten)]
    pub assessment: ReadingAssessment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAssessment {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub precipitation_probability_max: f64,
    pub day: ReadingAssessment,
    pub night: ReadingAssessment,
    pub day_notes: Vec<String>,
    pub night_notes: Vec<String>,
}

/// Everything the presentation layer needs for one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionsReport {
    pub location: Location,
    pub unit: TemperatureUnit,
    pub thresholds: Thresholds,
    pub current: Option<ReadingAssessment>,
    pub hourly: Vec<HourlyAssessment>,
    pub daily: Vec<DailyAssessment>,
    /// Sections or entries that could not be evaluated
    pub warnings: Vec<String>,
}

impl ConditionsReport {
    /// Evaluate a Celsius forecast in the requested display unit.
    ///
    /// A reading that fails validation is left out and recorded in
    /// `warnings`; the rest of the report is still produced.
    #[must_use]
    pub fn build(forecast: &WeatherForecast, unit: TemperatureUnit, hourly_limit: usize) -> Self {
        let mut warnings = Vec::new();

        let current = match &forecast.current {
            Some(sample) => {
                let reading = Reading::new(
                    unit.from_celsius(sample.temperature),
                    sample.relative_humidity,
                    unit,
                );
                ReadingAssessment::evaluate(reading)
                    .map_err(|e| warnings.push(format!("Current conditions: {e}")))
                    .ok()
            }
            None => {
                warnings.push(SnowcastError::missing_data("Current weather data").user_message());
                None
            }
        };

        let hourly = forecast
            .upcoming_hours(hourly_limit)
            .into_iter()
            .filter_map(|sample| {
                let reading = Reading::new(
                    unit.from_celsius(sample.temperature),
                    sample.relative_humidity,
                    unit,
                );
                match ReadingAssessment::evaluate(reading) {
                    Ok(assessment) => Some(HourlyAssessment {
                        time: sample.time,
                        assessment,
                    }),
                    Err(e) => {
                        warnings.push(format!("Hourly forecast {}: {e}", sample.time));
                        None
                    }
                }
            })
            .collect();

        if forecast.daily.is_empty() {
            warnings.push(SnowcastError::missing_data("Daily forecast data").user_message());
        }

        let series: Vec<DailySample> = forecast.daily.iter().map(|d| d.in_unit(unit)).collect();
        let daily = (0..series.len())
            .filter_map(|index| match assess_day(&series, index, unit) {
                Ok(day) => Some(day),
                Err(e) => {
                    warnings.push(format!("Daily forecast {}: {e}", series[index].date));
                    None
                }
            })
            .collect();

        Self {
            location: forecast.location.clone(),
            unit,
            thresholds: Thresholds::for_unit(unit),
            current,
            hourly,
            daily,
            warnings,
        }
    }
}

fn assess_day(series: &[DailySample], index: usize, unit: TemperatureUnit) -> Result<DailyAssessment> {
    let entry = &series[index];
    let day = ReadingAssessment::evaluate(advisory::daily_reading(entry, false, unit))?;
    let night = ReadingAssessment::evaluate(advisory::daily_reading(entry, true, unit))?;

    Ok(DailyAssessment {
        date: entry.date,
        high: entry.max_temperature,
        low: entry.min_temperature,
        precipitation_probability_max: entry.precipitation_probability_max,
        day,
        night,
        day_notes: messages(advisory::build_notes(series, index, false, unit)?),
        night_notes: messages(advisory::build_notes(series, index, true, unit)?),
    })
}

fn messages(notes: Vec<AdvisoryNote>) -> Vec<String> {
    notes.into_iter().map(|note| note.message().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrentSample, HourlySample};
    use chrono::Utc;

    fn time(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 10)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn forecast() -> WeatherForecast {
        WeatherForecast {
            location: Location::new(39.64, -106.37, "Vail".to_string()),
            timezone: "America/Denver".to_string(),
            current: Some(CurrentSample {
                time: time(6),
                temperature: -10.0,
                relative_humidity: 70.0,
            }),
            hourly: (0..24)
                .map(|hour| HourlySample {
                    time: time(hour),
                    temperature: -12.0 + f64::from(hour) * 0.5,
                    relative_humidity: 65.0,
                })
                .collect(),
            daily: vec![
                DailySample {
                    date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
                    max_temperature: -1.0,
                    min_temperature: -14.0,
                    humidity_max: 85.0,
                    humidity_min: 50.0,
                    precipitation_probability_max: 10.0,
                },
                DailySample {
                    date: NaiveDate::from_ymd_opt(2026, 1, 11).unwrap(),
                    max_temperature: 4.0,
                    min_temperature: -6.0,
                    humidity_max: 90.0,
                    humidity_min: 55.0,
                    precipitation_probability_max: 75.0,
                },
            ],
            retrieved_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_report() {
        let report = ConditionsReport::build(&forecast(), TemperatureUnit::Fahrenheit, DEFAULT_HOURLY_LIMIT);

        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        let current = report.current.unwrap();
        assert!((current.temperature - 14.0).abs() < 1e-9);
        assert_eq!(current.band, QualityBand::Excellent);
        assert_eq!(current.color, ColorHint::Blue);
        assert_eq!(current.degrees_too_warm, None);

        assert_eq!(report.hourly.len(), DEFAULT_HOURLY_LIMIT);
        assert_eq!(report.hourly[0].time, time(6));

        assert_eq!(report.daily.len(), 2);
        assert!(report.daily[0].day_notes.contains(&AdvisoryNote::PrecipitationRisk.to_string()));
        assert!(report.daily[1].night_notes.contains(&AdvisoryNote::PrecipitationRisk.to_string()));
    }

    #[test]
    fn test_report_in_celsius_keeps_bands() {
        let fahrenheit = ConditionsReport::build(&forecast(), TemperatureUnit::Fahrenheit, 12);
        let celsius = ConditionsReport::build(&forecast(), TemperatureUnit::Celsius, 12);

        assert!((celsius.current.as_ref().unwrap().temperature + 10.0).abs() < 1e-9);
        let bands = |r: &ConditionsReport| r.hourly.iter().map(|h| h.assessment.band).collect::<Vec<_>>();
        assert_eq!(bands(&fahrenheit), bands(&celsius));
    }

    #[test]
    fn test_too_warm_reports_margin() {
        let reading = Reading::new(50.0, 50.0, TemperatureUnit::Fahrenheit);
        let assessment = ReadingAssessment::evaluate(reading).unwrap();
        assert_eq!(assessment.band, QualityBand::TooWarm);
        assert_eq!(assessment.label, "Too Warm");
        let margin = assessment.degrees_too_warm.unwrap();
        assert!((margin - (assessment.wet_bulb - 28.0)).abs() < 1e-9);
    }

    #[test]
    fn test_marginal_has_no_margin() {
        let reading = Reading::new(28.0, 70.0, TemperatureUnit::Fahrenheit);
        let assessment = ReadingAssessment::evaluate(reading).unwrap();
        assert_eq!(assessment.band, QualityBand::Marginal);
        assert_eq!(assessment.degrees_too_warm, None);
    }

    #[test]
    fn test_missing_sections_become_warnings() {
        let mut forecast = forecast();
        forecast.current = None;
        forecast.daily.clear();

        let report = ConditionsReport::build(&forecast, TemperatureUnit::Fahrenheit, 12);
        assert!(report.current.is_none());
        assert!(report.daily.is_empty());
        assert_eq!(report.hourly.len(), 12);
        assert_eq!(
            report.warnings,
            vec![
                "Current weather data is unavailable.".to_string(),
                "Daily forecast data is unavailable.".to_string(),
            ]
        );
    }

    #[test]
    fn test_invalid_reading_only_skips_itself() {
        let mut forecast = forecast();
        forecast.hourly[7].relative_humidity = 120.0;
        forecast.daily[1].humidity_min = -5.0;

        let report = ConditionsReport::build(&forecast, TemperatureUnit::Fahrenheit, 12);
        assert!(report.current.is_some());
        assert_eq!(report.hourly.len(), 11);
        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.warnings.len(), 2);
    }
}
