//! Advisory notes attached to daily forecast entries

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::quality::Thresholds;
use super::wet_bulb::Reading;
use crate::models::{DailySample, TemperatureUnit};
use crate::{Result, SnowcastError};

/// Days scanned (including the entry itself) for a precipitation risk
pub const PRECIPITATION_WINDOW_DAYS: usize = 3;
/// Precipitation probability, in percent, above which a note is raised
pub const PRECIPITATION_PROBABILITY_LIMIT: f64 = 60.0;
/// Days scanned (including the entry itself) for a warm spell
pub const WARM_SPELL_WINDOW_DAYS: usize = 5;
/// Daily high, in °F, above which a warm spell is reported
pub const WARM_SPELL_MAX_TEMPERATURE_F: f64 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryNote {
    IdealConditions,
    PrecipitationRisk,
    WarmSpell,
    EarlySeason,
    LateSeason,
    ResortDiscretion,
}

impl AdvisoryNote {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::IdealConditions => "Ideal snowmaking conditions.",
            Self::PrecipitationRisk => {
                "Precipitation is likely within the next few days; snowmaking may be interrupted."
            }
            Self::WarmSpell => {
                "Warm temperatures are expected in the coming days; man-made snow may not hold up."
            }
            Self::EarlySeason => {
                "Early season: resorts often wait for a sustained cold stretch before firing up the guns."
            }
            Self::LateSeason => "Late season: many resorts have already ended snowmaking for the year.",
            Self::ResortDiscretion => {
                "Whether snow is actually made is at the discretion of each resort."
            }
        }
    }
}

impl fmt::Display for AdvisoryNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Derive the advisory notes for one day (or night) of a daily series.
///
/// `series` must already be expressed in `unit`. The day reading pairs the
/// daily high with the lowest humidity, the night reading pairs the low with
/// the highest humidity.
pub fn build_notes(
    series: &[DailySample],
    day_index: usize,
    is_night: bool,
    unit: TemperatureUnit,
) -> Result<Vec<AdvisoryNote>> {
    let entry = series
        .get(day_index)
        .ok_or_else(|| SnowcastError::missing_data(format!("daily forecast entry {day_index}")))?;

    let thresholds = Thresholds::for_unit(unit);
    let wet_bulb = daily_reading(entry, is_night, unit).wet_bulb()?.value;
    let mut notes = Vec::new();

    if wet_bulb <= thresholds.excellent {
        notes.push(AdvisoryNote::IdealConditions);
    }

    if window(series, day_index, PRECIPITATION_WINDOW_DAYS)
        .iter()
        .any(|day| day.precipitation_probability_max > PRECIPITATION_PROBABILITY_LIMIT)
    {
        notes.push(AdvisoryNote::PrecipitationRisk);
    }

    let warm_limit = unit.from_fahrenheit(WARM_SPELL_MAX_TEMPERATURE_F);
    if window(series, day_index, WARM_SPELL_WINDOW_DAYS)
        .iter()
        .any(|day| day.max_temperature > warm_limit)
    {
        notes.push(AdvisoryNote::WarmSpell);
    }

    if is_early_season(entry.date) {
        notes.push(AdvisoryNote::EarlySeason);
    } else if is_late_season(entry.date) {
        notes.push(AdvisoryNote::LateSeason);
    }

    if wet_bulb < thresholds.good {
        notes.push(AdvisoryNote::ResortDiscretion);
    }

    Ok(notes)
}

/// Reading used to evaluate the day or night half of a daily sample
#[must_use]
pub fn daily_reading(entry: &DailySample, is_night: bool, unit: TemperatureUnit) -> Reading {
    if is_night {
        Reading::new(entry.min_temperature, entry.humidity_max, unit)
    } else {
        Reading::new(entry.max_temperature, entry.humidity_min, unit)
    }
}

fn window(series: &[DailySample], start: usize, days: usize) -> &[DailySample] {
    let end = start.saturating_add(days).min(series.len());
    &series[start.min(end)..end]
}

/// Aug 1 through Dec 15
#[must_use]
pub fn is_early_season(date: NaiveDate) -> bool {
    match date.month() {
        8..=11 => true,
        12 => date.day() <= 15,
        _ => false,
    }
}

/// Mar 5 through Jul 31
#[must_use]
pub fn is_late_season(date: NaiveDate) -> bool {
    match date.month() {
        3 => date.day() >= 5,
        4..=7 => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(date: (i32, u32, u32), max: f64, min: f64, precipitation: f64) -> DailySample {
        DailySample {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            max_temperature: max,
            min_temperature: min,
            humidity_max: 80.0,
            humidity_min: 40.0,
            precipitation_probability_max: precipitation,
        }
    }

    #[test]
    fn test_precipitation_note_only_on_first_day() {
        let series = vec![
            day((2026, 1, 10), 20.0, 5.0, 70.0),
            day((2026, 1, 11), 20.0, 5.0, 30.0),
            day((2026, 1, 12), 20.0, 5.0, 40.0),
        ];
        let unit = TemperatureUnit::Fahrenheit;

        let first = build_notes(&series, 0, false, unit).unwrap();
        assert_eq!(
            first.iter().filter(|n| **n == AdvisoryNote::PrecipitationRisk).count(),
            1
        );
        for index in 1..series.len() {
            let notes = build_notes(&series, index, false, unit).unwrap();
            assert!(!notes.contains(&AdvisoryNote::PrecipitationRisk));
        }
    }

    #[test]
    fn test_precipitation_window_looks_ahead_three_days() {
        let series = vec![
            day((2026, 1, 10), 20.0, 5.0, 10.0),
            day((2026, 1, 11), 20.0, 5.0, 10.0),
            day((2026, 1, 12), 20.0, 5.0, 61.0),
            day((2026, 1, 13), 20.0, 5.0, 10.0),
        ];
        let unit = TemperatureUnit::Fahrenheit;
        assert!(build_notes(&series, 0, false, unit).unwrap().contains(&AdvisoryNote::PrecipitationRisk));

        let series = vec![
            day((2026, 1, 10), 20.0, 5.0, 10.0),
            day((2026, 1, 11), 20.0, 5.0, 10.0),
            day((2026, 1, 12), 20.0, 5.0, 60.0),
            day((2026, 1, 13), 20.0, 5.0, 99.0),
        ];
        assert!(!build_notes(&series, 0, false, unit).unwrap().contains(&AdvisoryNote::PrecipitationRisk));
    }

    #[test]
    fn test_warm_spell_window_looks_ahead_five_days() {
        let mut series: Vec<DailySample> = (10..17).map(|d| day((2026, 1, d), 30.0, 10.0, 0.0)).collect();
        series[4].max_temperature = 46.0;
        let unit = TemperatureUnit::Fahrenheit;

        assert!(build_notes(&series, 0, false, unit).unwrap().contains(&AdvisoryNote::WarmSpell));
        assert!(build_notes(&series, 4, true, unit).unwrap().contains(&AdvisoryNote::WarmSpell));
        assert!(!build_notes(&series, 5, false, unit).unwrap().contains(&AdvisoryNote::WarmSpell));
    }

    #[test]
    fn test_warm_spell_limit_converted_for_celsius() {
        // 45°F is 7.22°C
        let series = vec![day((2026, 1, 10), 7.5, -8.0, 0.0)];
        let notes = build_notes(&series, 0, true, TemperatureUnit::Celsius).unwrap();
        assert!(notes.contains(&AdvisoryNote::WarmSpell));

        let series = vec![day((2026, 1, 10), 7.0, -8.0, 0.0)];
        let notes = build_notes(&series, 0, true, TemperatureUnit::Celsius).unwrap();
        assert!(!notes.contains(&AdvisoryNote::WarmSpell));
    }

    #[test]
    fn test_cold_night_notes_in_order() {
        let series = vec![day((2026, 1, 10), 30.0, 10.0, 0.0)];
        let notes = build_notes(&series, 0, true, TemperatureUnit::Fahrenheit).unwrap();
        assert_eq!(
            notes,
            vec![AdvisoryNote::IdealConditions, AdvisoryNote::ResortDiscretion]
        );
    }

    #[test]
    fn test_all_notes_in_fixed_order() {
        let series = vec![day((2026, 11, 20), 50.0, 5.0, 80.0)];
        let notes = build_notes(&series, 0, true, TemperatureUnit::Fahrenheit).unwrap();
        assert_eq!(
            notes,
            vec![
                AdvisoryNote::IdealConditions,
                AdvisoryNote::PrecipitationRisk,
                AdvisoryNote::WarmSpell,
                AdvisoryNote::EarlySeason,
                AdvisoryNote::ResortDiscretion,
            ]
        );
    }

    #[test]
    fn test_warm_day_has_no_discretion_note() {
        let series = vec![day((2026, 1, 10), 40.0, 10.0, 0.0)];
        let notes = build_notes(&series, 0, false, TemperatureUnit::Fahrenheit).unwrap();
        assert!(notes.is_empty(), "got {notes:?}");
    }

    // Seasonal windows are reproduced literally: Dec 16 - Mar 4 carries no note.
    #[rstest]
    #[case((2026, 8, 1), true, false)]
    #[case((2026, 12, 15), true, false)]
    #[case((2026, 12, 16), false, false)]
    #[case((2026, 1, 15), false, false)]
    #[case((2026, 3, 4), false, false)]
    #[case((2026, 3, 5), false, true)]
    #[case((2026, 7, 31), false, true)]
    fn test_seasonal_windows(
        #[case] date: (i32, u32, u32),
        #[case] early: bool,
        #[case] late: bool,
    ) {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        assert_eq!(is_early_season(date), early);
        assert_eq!(is_late_season(date), late);
    }

    #[test]
    fn test_out_of_range_index_is_missing_data() {
        let series = vec![day((2026, 1, 10), 30.0, 10.0, 0.0)];
        let result = build_notes(&series, 3, false, TemperatureUnit::Fahrenheit);
        assert!(matches!(result, Err(SnowcastError::MissingData { .. })));
    }

    #[test]
    fn test_invalid_humidity_propagates() {
        let mut entry = day((2026, 1, 10), 30.0, 10.0, 0.0);
        entry.humidity_min = 140.0;
        let result = build_notes(&[entry], 0, false, TemperatureUnit::Fahrenheit);
        assert!(matches!(result, Err(SnowcastError::InvalidInput { .. })));
    }
}
