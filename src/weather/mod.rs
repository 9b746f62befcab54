use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

use crate::config::WeatherConfig;
use crate::models::{Location, WeatherForecast};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Anything that can produce a Celsius forecast for a location
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn forecast(&self, location: &Location) -> Result<WeatherForecast>;
}

/// HTTP client shared by the weather and geocoding adapters, retrying
/// transient failures with exponential backoff.
pub fn build_http_client(config: &WeatherConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(concat!("snowcast/", env!("CARGO_PKG_VERSION")))
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
