// Allow dead code: Infrastructure methods for future use
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{ClothingItem, Outfit, User};

/// Consider cache stale after 1 hour.
/// Balances freshness with reducing unnecessary API calls for slowly-changing data.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                // Round up: 1d 12h+ becomes 2d
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    // ===== Clothing Items =====

    pub fn load_items(&self) -> Result<Option<CachedData<Vec<ClothingItem>>>> {
        self.load("items")
    }

    pub fn save_items(&self, items: &[ClothingItem]) -> Result<()> {
        self.save("items", &items)
    }

    // ===== Outfits =====

    pub fn load_outfits(&self) -> Result<Option<CachedData<Vec<Outfit>>>> {
        self.load("outfits")
    }

    pub fn save_outfits(&self, outfits: &[Outfit]) -> Result<()> {
        self.save("outfits", &outfits)
    }

    // ===== User Profile =====

    pub fn load_profile(&self) -> Result<Option<CachedData<User>>> {
        self.load("profile")
    }

    pub fn save_profile(&self, user: &User) -> Result<()> {
        self.save("profile", user)
    }

    // ===== Processed Images =====

    /// Write a processed image next to the cache files, returning its path
    pub fn save_image(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let images_dir = self.cache_dir.join("images");
        std::fs::create_dir_all(&images_dir)?;
        let path = images_dir.join(filename);
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write image {}", path.display()))?;
        Ok(path)
    }

    // ===== Cache Age Information =====

    /// Helper to load cache and log errors without failing
    fn load_age<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> Option<String> {
        match loader() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }

    pub fn get_cache_ages(&self) -> CacheAges {
        CacheAges {
            items: self.load_age("items", || self.load_items()),
            outfits: self.load_age("outfits", || self.load_outfits()),
            profile: self.load_age("profile", || self.load_profile()),
        }
    }

    /// Helper to check staleness and log errors without failing
    fn is_cache_stale<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> bool {
        match loader() {
            Ok(Some(cached)) => cached.is_stale(),
            Ok(None) => true, // No cache = stale
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for staleness check");
                true // Error reading = treat as stale
            }
        }
    }

    /// Check if any of the core cached data is stale
    pub fn any_stale(&self) -> bool {
        let stale_checks = [
            self.is_cache_stale("items", || self.load_items()),
            self.is_cache_stale("outfits", || self.load_outfits()),
        ];
        stale_checks.iter().any(|&stale| stale)
    }
}

#[derive(Debug, Default)]
pub struct CacheAges {
    pub items: Option<String>,
    pub outfits: Option<String>,
    pub profile: Option<String>,
}

impl CacheAges {
    /// Returns the most recent update time across the closet caches
    pub fn last_updated(&self) -> String {
        let ages = [&self.items, &self.outfits];

        for a in ages.iter().copied().flatten() {
            return a.clone();
        }

        "never".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        // Just created, should be "just now"
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_age_display_rounding() {
        let mut cached = CachedData::new(vec![1]);
        cached.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(cached.age_display(), "5m ago");

        cached.cached_at = Utc::now() - Duration::minutes(95);
        assert_eq!(cached.age_display(), "2h ago"); // 1h 35m rounds up

        cached.cached_at = Utc::now() - Duration::minutes(61);
        assert_eq!(cached.age_display(), "1h ago");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        // Create a cached data that's 61 minutes old
        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(61);
        assert!(old.is_stale());
    }

    #[test]
    fn test_cache_ages_last_updated_with_values() {
        let ages = CacheAges {
            items: Some("5m ago".to_string()),
            outfits: None,
            profile: None,
        };
        assert_eq!(ages.last_updated(), "5m ago");
    }

    #[test]
    fn test_cache_ages_last_updated_empty() {
        let ages = CacheAges::default();
        assert_eq!(ages.last_updated(), "never");
    }
}
