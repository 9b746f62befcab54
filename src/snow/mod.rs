//! Snowmaking module
//!
//! Pure evaluation of weather readings for snowmaking:
//! - Wet-bulb estimation in the active display unit
//! - Quality band classification against unit-converted thresholds
//! - Advisory notes for daily forecast entries
//! - Report assembly for current, hourly and daily readings

pub mod advisory;
pub mod quality;
pub mod report;
pub mod wet_bulb;

pub use advisory::{AdvisoryNote, build_notes};
pub use quality::{ColorHint, QualityBand, Thresholds, border_color, classify};
pub use report::{ConditionsReport, DailyAssessment, HourlyAssessment, ReadingAssessment};
pub use wet_bulb::{Reading, WetBulbEstimate, estimate_wet_bulb};
