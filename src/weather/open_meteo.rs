//! Open-Meteo forecast client
//!
//! Requests current, hourly and daily temperature/humidity data in Celsius
//! and converts the columnar response into [`WeatherForecast`] samples.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::{WeatherSource, build_http_client};
use crate::SnowcastError;
use crate::config::WeatherConfig;
use crate::models::{CurrentSample, DailySample, HourlySample, Location, WeatherForecast};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,relative_humidity_2m_max,relative_humidity_2m_min,precipitation_probability_max";

pub struct OpenMeteoClient {
    client: ClientWithMiddleware,
    base_url: String,
    forecast_days: u32,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Ok(Self::with_client(build_http_client(config)?, config))
    }

    #[must_use]
    pub fn with_client(client: ClientWithMiddleware, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            forecast_days: config.forecast_days,
        }
    }

    fn forecast_url(&self, location: &Location) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&current={CURRENT_FIELDS}&hourly={HOURLY_FIELDS}&daily={DAILY_FIELDS}&timezone=auto&forecast_days={}",
            self.base_url, location.latitude, location.longitude, self.forecast_days
        )
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = location.latitude, lon = location.longitude))]
    async fn forecast(&self, location: &Location) -> Result<WeatherForecast> {
        let start_time = Instant::now();
        let url = self.forecast_url(location);
        debug!("Open-Meteo request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SnowcastError::api(format!("Weather data fetch failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Open-Meteo returned HTTP {}", status);
            return Err(SnowcastError::api(format!("Weather data fetch failed: {status}")).into());
        }

        let forecast_response: ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Open-Meteo forecast response")?;

        let forecast = WeatherForecast::from_open_meteo(forecast_response, location.clone());

        info!(
            "Retrieved forecast with {} hourly and {} daily samples in {:.3}s",
            forecast.hourly.len(),
            forecast.daily.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(forecast)
    }
}

/// Forecast response from Open-Meteo
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub timezone: Option<String>,
    pub current: Option<CurrentData>,
    pub hourly: Option<HourlyData>,
    pub daily: Option<DailyData>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentData {
    pub time: String,
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<f64>,
    #[serde(rename = "relative_humidity_2m")]
    pub relative_humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct HourlyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m", default)]
    pub temperature: Vec<Option<f64>>,
    #[serde(rename = "relative_humidity_2m", default)]
    pub relative_humidity: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max", default)]
    pub temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min", default)]
    pub temperature_min: Vec<Option<f64>>,
    #[serde(rename = "relative_humidity_2m_max", default)]
    pub humidity_max: Vec<Option<f64>>,
    #[serde(rename = "relative_humidity_2m_min", default)]
    pub humidity_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

impl CurrentData {
    fn to_sample(&self) -> Option<CurrentSample> {
        Some(CurrentSample {
            time: NaiveDateTime::parse_from_str(&self.time, TIME_FORMAT).ok()?,
            temperature: self.temperature?,
            relative_humidity: self.relative_humidity?,
        })
    }
}

impl HourlyData {
    fn to_samples(&self) -> Vec<HourlySample> {
        self.time
            .iter()
            .enumerate()
            .filter_map(|(i, time)| {
                Some(HourlySample {
                    time: NaiveDateTime::parse_from_str(time, TIME_FORMAT).ok()?,
                    temperature: value_at(&self.temperature, i)?,
                    relative_humidity: value_at(&self.relative_humidity, i)?,
                })
            })
            .collect()
    }
}

impl DailyData {
    fn to_samples(&self) -> Vec<DailySample> {
        self.time
            .iter()
            .enumerate()
            .filter_map(|(i, date)| {
                Some(DailySample {
                    date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?,
                    max_temperature: value_at(&self.temperature_max, i)?,
                    min_temperature: value_at(&self.temperature_min, i)?,
                    humidity_max: value_at(&self.humidity_max, i)?,
                    humidity_min: value_at(&self.humidity_min, i)?,
                    // A missing probability means no precipitation signal for that day
                    precipitation_probability_max: value_at(&self.precipitation_probability_max, i)
                        .unwrap_or(0.0),
                })
            })
            .collect()
    }
}

impl WeatherForecast {
    /// Create forecast from an Open-Meteo response; samples with missing
    /// values are dropped.
    #[must_use]
    pub fn from_open_meteo(response: ForecastResponse, location: Location) -> Self {
        let current = response.current.as_ref().and_then(CurrentData::to_sample);
        let hourly = response.hourly.as_ref().map(HourlyData::to_samples).unwrap_or_default();
        let daily = response.daily.as_ref().map(DailyData::to_samples).unwrap_or_default();

        if response.current.is_some() && current.is_none() {
            debug!("Discarding incomplete current conditions");
        }

        Self {
            location,
            timezone: response.timezone.unwrap_or_else(|| "GMT".to_string()),
            current,
            hourly,
            daily,
            retrieved_at: Utc::now(),
        }
    }
}
