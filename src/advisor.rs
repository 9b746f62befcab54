//! Snowmaking advisor service
//!
//! Resolves the requested location, fetches (or reuses) its forecast and
//! evaluates it in the requested display unit.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use crate::cache::ForecastCache;
use crate::config::SnowcastConfig;
use crate::location_resolver::{LocationInput, LocationResolver, OpenMeteoGeocoder};
use crate::models::{Location, TemperatureUnit, WeatherForecast};
use crate::snow::ConditionsReport;
use crate::weather::{OpenMeteoClient, WeatherSource};

#[derive(Clone)]
pub struct Advisor {
    source: Arc<dyn WeatherSource>,
    resolver: LocationResolver,
    cache: Arc<ForecastCache>,
    cache_ttl: Duration,
    hourly_limit: usize,
}

impl Advisor {
    #[must_use]
    pub fn new(
        source: Arc<dyn WeatherSource>,
        resolver: LocationResolver,
        config: &SnowcastConfig,
    ) -> Self {
        Self {
            source,
            resolver,
            cache: Arc::new(ForecastCache::new()),
            cache_ttl: Duration::from_secs(u64::from(config.cache.ttl_minutes) * 60),
            hourly_limit: config.defaults.hourly_limit,
        }
    }

    /// Advisor wired to the Open-Meteo forecast and geocoding services
    pub fn from_config(config: &SnowcastConfig) -> Result<Self> {
        let source = Arc::new(OpenMeteoClient::new(&config.weather)?);
        let geocoder = Arc::new(OpenMeteoGeocoder::new(&config.weather)?);
        Ok(Self::new(source, LocationResolver::new(geocoder), config))
    }

    /// Location suggestions for a partial query
    pub async fn suggestions(&self, query: &str) -> Result<Vec<Location>> {
        self.resolver.search(query).await
    }

    /// Full conditions report for a location in the given display unit
    #[instrument(skip(self))]
    pub async fn conditions(&self, input: LocationInput, unit: TemperatureUnit) -> Result<ConditionsReport> {
        let location = self.resolver.resolve(input).await?;
        let forecast = self.forecast(&location).await?;
        let report = ConditionsReport::build(&forecast, unit, self.hourly_limit);

        for warning in &report.warnings {
            warn!("{}", warning);
        }
        Ok(report)
    }

    /// Forecast for a resolved location, served from cache while fresh
    pub async fn forecast(&self, location: &Location) -> Result<WeatherForecast> {
        let key = location.cache_key();

        match self.cache.get::<WeatherForecast>(&key).await {
            Ok(Some(mut cached)) => {
                debug!("Serving cached forecast for {}", key);
                // coordinates round to the same key, keep the name that was asked for
                cached.location = location.clone();
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable cache entry {}: {}", key, e),
        }

        let forecast = self.source.forecast(location).await?;
        if let Err(e) = self.cache.put_jittered(&key, &forecast, self.cache_ttl).await {
            warn!("Failed to cache forecast {}: {}", key, e);
        }
        info!("Fetched forecast for {}", location.display_name());
        Ok(forecast)
    }
}
