//! Location Resolution Module
//!
//! This module handles resolving location inputs (coordinates or names)
//! into structured Location objects, and provides search suggestions.

use crate::SnowcastError;
use crate::config::WeatherConfig;
use crate::models::Location;
use crate::weather::build_http_client;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Queries shorter than this return no suggestions
pub const MIN_QUERY_LENGTH: usize = 3;
/// Maximum number of suggestions returned by a search
pub const MAX_RESULTS: usize = 5;

/// User-supplied location
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    Coordinates(f64, f64),
    Name(String),
}

impl LocationInput {
    /// "lat,lon" becomes coordinates, anything else a name
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some((lat, lon)) = input.split_once(',') {
            if let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
                return Self::Coordinates(lat, lon);
            }
        }
        Self::Name(input.to_string())
    }
}

/// Forward and reverse geocoding
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Location>>;
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<Location>>;
}

/// Open-Meteo geocoding for names, Nominatim for coordinates
pub struct OpenMeteoGeocoder {
    client: ClientWithMiddleware,
    geocoding_url: String,
    reverse_geocoding_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Ok(Self::with_client(build_http_client(config)?, config))
    }

    #[must_use]
    pub fn with_client(client: ClientWithMiddleware, config: &WeatherConfig) -> Self {
        Self {
            client,
            geocoding_url: config.geocoding_url.trim_end_matches('/').to_string(),
            reverse_geocoding_url: config.reverse_geocoding_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SnowcastError::api(format!("{what} fetch failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SnowcastError::api(format!("{what} fetch failed: {status}")).into());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {what} response"))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        Self {
            latitude: result.latitude,
            longitude: result.longitude,
            name: result.name,
            state: result.admin1,
            country: result.country,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    name: Option<String>,
    address: Option<ReverseAddress>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl ReverseResponse {
    fn into_location(self, latitude: f64, longitude: f64) -> Option<Location> {
        if self.error.is_some() {
            return None;
        }
        let address = self.address?;
        let name = address
            .city
            .or(address.town)
            .or(address.village)
            .or(address.hamlet)
            .or(self.name.filter(|n| !n.is_empty()))?;

        Some(Location {
            latitude,
            longitude,
            name,
            state: address.state,
            country: address.country,
        })
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Location>> {
        let url = format!(
            "{}/search?name={}&count={MAX_RESULTS}&language=en&format=json",
            self.geocoding_url,
            urlencoding::encode(query)
        );
        let response: GeocodingResponse = self.get_json(&url, "Location").await?;
        let results: Vec<Location> = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Location::from)
            .collect();

        if results.is_empty() {
            warn!("No results found for location '{}'", query);
        } else {
            debug!(
                "Geocoding results: {:?}",
                results.iter().map(Location::display_name).collect::<Vec<_>>()
            );
        }
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<Location>> {
        let url = format!(
            "{}/reverse?lat={latitude}&lon={longitude}&format=jsonv2",
            self.reverse_geocoding_url
        );
        let response: ReverseResponse = self.get_json(&url, "Nearest city").await?;
        Ok(response.into_location(latitude, longitude))
    }
}

/// Service for resolving location inputs
#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl LocationResolver {
    #[must_use]
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Location suggestions for a partially typed query
    pub async fn search(&self, query: &str) -> Result<Vec<Location>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LENGTH {
            return Ok(Vec::new());
        }
        let mut results = self.geocoder.search(query).await?;
        results.truncate(MAX_RESULTS);
        Ok(results)
    }

    /// Resolve a location input into a structured Location
    pub async fn resolve(&self, input: LocationInput) -> Result<Location> {
        debug!("Resolving location input: {:?}", input);

        let location = match input {
            LocationInput::Coordinates(lat, lon) => self.resolve_coordinates(lat, lon).await?,
            LocationInput::Name(name) => self.resolve_name(&name).await?,
        };

        info!(
            "Resolved location: {} at ({:.4}, {:.4})",
            location.display_name(),
            location.latitude,
            location.longitude
        );
        Ok(location)
    }

    /// Resolve coordinates to a location with proper name via reverse geocoding
    async fn resolve_coordinates(&self, lat: f64, lon: f64) -> Result<Location> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(SnowcastError::validation(format!(
                "Coordinates out of range: {lat}, {lon}"
            ))
            .into());
        }

        match self.geocoder.reverse(lat, lon).await {
            Ok(Some(location)) => Ok(location),
            Ok(None) => {
                debug!("No reverse geocoding result, using coordinates as name");
                Ok(Location::from_coordinates(lat, lon))
            }
            Err(e) => {
                warn!("Reverse geocoding failed: {}, using coordinates as name", e);
                Ok(Location::from_coordinates(lat, lon))
            }
        }
    }

    /// Resolve a location name to coordinates via geocoding
    async fn resolve_name(&self, name: &str) -> Result<Location> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SnowcastError::validation("Location cannot be empty").into());
        }

        self.geocoder
            .search(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                SnowcastError::not_found("Location not found. Please enter a valid location.").into()
            })
    }
}
