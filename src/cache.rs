use anyhow::Result;
use rand::RngExt;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::fmt::Debug;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::SnowcastError;

struct StoredEntry {
    bytes: Vec<u8>,
    expires_at: Instant,
}

/// In-memory TTL cache; values are stored as postcard bytes.
#[derive(Default)]
pub struct ForecastCache {
    store: RwLock<HashMap<String, StoredEntry>>,
}

impl ForecastCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a serializable value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize + Debug>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| SnowcastError::cache("TTL overflow"))?;
        let bytes = postcard::to_stdvec(value)
            .map_err(|e| SnowcastError::cache(format!("Failed to encode {key}: {e}")))?;

        let mut store = self.store.write().await;
        let now = Instant::now();
        store.retain(|_, entry| now < entry.expires_at);
        store.insert(key.to_string(), StoredEntry { bytes, expires_at });
        Ok(())
    }

    /// Stores a value with the TTL jittered by ±10% so entries do not expire together.
    pub async fn put_jittered<T: Serialize + Debug>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let jitter: f64 = rand::rng().random_range(0.9..1.1);
        self.put(key, value, ttl.mul_f64(jitter)).await
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let fresh = {
            let store = self.store.read().await;
            match store.get(key) {
                Some(entry) if Instant::now() < entry.expires_at => Some(entry.bytes.clone()),
                Some(_) => None,
                None => {
                    tracing::debug!("Key not found");
                    return Ok(None);
                }
            }
        };

        match fresh {
            Some(bytes) => {
                tracing::debug!("Key found and still fresh");
                Ok(Some(postcard::from_bytes(&bytes)?))
            }
            None => {
                tracing::debug!("Key found but expired");
                let mut store = self.store.write().await;
                // a put may have refreshed the key since the read lock was dropped
                if store
                    .get(key)
                    .is_some_and(|entry| Instant::now() >= entry.expires_at)
                {
                    store.remove(key);
                }
                Ok(None)
            }
        }
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) {
        self.store.write().await.remove(key);
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailySample, Location, WeatherForecast};
    use chrono::{NaiveDate, Utc};

    fn forecast() -> WeatherForecast {
        WeatherForecast {
            location: Location::new(47.13, 10.27, "St. Anton".to_string()),
            timezone: "Europe/Vienna".to_string(),
            current: None,
            hourly: Vec::new(),
            daily: vec![DailySample {
                date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
                max_temperature: -2.0,
                min_temperature: -9.5,
                humidity_max: 88.0,
                humidity_min: 61.0,
                precipitation_probability_max: 35.0,
            }],
            retrieved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = ForecastCache::new();
        cache
            .put("forecast:47.13:10.27", &forecast(), Duration::from_secs(60))
            .await
            .unwrap();

        let cached: WeatherForecast = cache.get("forecast:47.13:10.27").await.unwrap().unwrap();
        assert_eq!(cached.daily, forecast().daily);
        assert_eq!(cached.location, forecast().location);
    }

    #[tokio::test]
    async fn test_missing_key() {
        let cache = ForecastCache::new();
        let cached: Option<WeatherForecast> = cache.get("nope").await.unwrap();
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_removed() {
        let cache = ForecastCache::new();
        cache.put("short", &42u32, Duration::ZERO).await.unwrap();
        assert_eq!(cache.len().await, 1);

        let cached: Option<u32> = cache.get("short").await.unwrap();
        assert!(cached.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_sweeps_expired_entries() {
        let cache = ForecastCache::new();
        for i in 0..1000 {
            cache.put(&format!("stale:{i}"), &i, Duration::ZERO).await.unwrap();
        }

        cache.put("fresh", &7u32, Duration::from_secs(60)).await.unwrap();
        let cached: Option<u32> = cache.get("fresh").await.unwrap();

        assert_eq!(cached, Some(7));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_refreshed_entry_survives_expired_read() {
        let cache = ForecastCache::new();
        cache.put("key", &1u32, Duration::ZERO).await.unwrap();
        cache.put("key", &2u32, Duration::from_secs(60)).await.unwrap();

        let cached: Option<u32> = cache.get("key").await.unwrap();
        assert_eq!(cached, Some(2));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_drops_entry() {
        let cache = ForecastCache::new();
        cache.put("gone", &1u32, Duration::from_secs(60)).await.unwrap();
        cache.remove("gone").await;

        let cached: Option<u32> = cache.get("gone").await.unwrap();
        assert!(cached.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_jittered_put_is_readable() {
        let cache = ForecastCache::new();
        cache
            .put_jittered("jitter", &"value".to_string(), Duration::from_secs(600))
            .await
            .unwrap();
        let cached: Option<String> = cache.get("jitter").await.unwrap();
        assert_eq!(cached.as_deref(), Some("value"));
    }
}
