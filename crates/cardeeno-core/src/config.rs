//! Configuration for the cardeeno learning core.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{CardeenoError, CardeenoResult};
use crate::types::MemoryBucket;

/// Review policy controlling bucket promotion and scheduling intervals.
///
/// The defaults encode the product policy: a card is promoted out of the
/// short-term bucket after 2 consecutive correct reviews and out of the
/// medium-term bucket after 3, and the buckets are revisited after 10
/// minutes, 1 day, and 7 days respectively. All values are configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewPolicy {
    /// Consecutive correct reviews needed to leave the short bucket.
    pub promote_to_medium_streak: u32,
    /// Consecutive correct reviews needed to leave the medium bucket.
    pub promote_to_long_streak: u32,
    /// Review interval for the short bucket, in minutes.
    pub short_interval_minutes: i64,
    /// Review interval for the medium bucket, in minutes.
    pub medium_interval_minutes: i64,
    /// Review interval for the long bucket, in minutes.
    pub long_interval_minutes: i64,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            promote_to_medium_streak: 2,
            promote_to_long_streak: 3,
            short_interval_minutes: 10,
            medium_interval_minutes: 24 * 60,
            long_interval_minutes: 7 * 24 * 60,
        }
    }
}

impl ReviewPolicy {
    /// Get the review interval for a bucket.
    pub fn interval(&self, bucket: MemoryBucket) -> Duration {
        let minutes = match bucket {
            MemoryBucket::Short => self.short_interval_minutes,
            MemoryBucket::Medium => self.medium_interval_minutes,
            MemoryBucket::Long => self.long_interval_minutes,
        };
        Duration::minutes(minutes)
    }

    /// Get the streak threshold at which a bucket promotes.
    ///
    /// Returns None for the long bucket, which has no further promotion.
    pub fn promotion_threshold(&self, bucket: MemoryBucket) -> Option<u32> {
        match bucket {
            MemoryBucket::Short => Some(self.promote_to_medium_streak),
            MemoryBucket::Medium => Some(self.promote_to_long_streak),
            MemoryBucket::Long => None,
        }
    }

    /// Validate that thresholds and intervals are usable.
    pub fn validate(&self) -> CardeenoResult<()> {
        if self.promote_to_medium_streak == 0 || self.promote_to_long_streak == 0 {
            return Err(CardeenoError::invalid_argument(
                "promotion streak thresholds must be at least 1",
            ));
        }
        if self.short_interval_minutes <= 0
            || self.medium_interval_minutes <= 0
            || self.long_interval_minutes <= 0
        {
            return Err(CardeenoError::invalid_argument(
                "review intervals must be positive",
            ));
        }
        Ok(())
    }
}

/// Main configuration for the learning core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Review policy for bucket promotion and scheduling.
    pub review: ReviewPolicy,
}

impl CoreConfig {
    /// Replace the review policy.
    pub fn with_review_policy(mut self, review: ReviewPolicy) -> Self {
        self.review = review;
        self
    }

    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> CardeenoResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CardeenoError::internal(format!("failed to read config: {}", e)))?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| CardeenoError::invalid_argument(e.to_string()))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| CardeenoError::invalid_argument(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| CardeenoError::invalid_argument(e.to_string()))?,
            _ => {
                return Err(CardeenoError::invalid_argument(
                    "Unsupported config file format. Use .toml, .json, or .yaml",
                ))
            }
        };

        config.review.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `CARDEENO_PROMOTE_TO_MEDIUM_STREAK` (default: 2)
    /// - `CARDEENO_PROMOTE_TO_LONG_STREAK` (default: 3)
    /// - `CARDEENO_SHORT_INTERVAL_MINUTES` (default: 10)
    /// - `CARDEENO_MEDIUM_INTERVAL_MINUTES` (default: 1440)
    /// - `CARDEENO_LONG_INTERVAL_MINUTES` (default: 10080)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(streak) = env_parse("CARDEENO_PROMOTE_TO_MEDIUM_STREAK") {
            config.review.promote_to_medium_streak = streak;
        }
        if let Some(streak) = env_parse("CARDEENO_PROMOTE_TO_LONG_STREAK") {
            config.review.promote_to_long_streak = streak;
        }
        if let Some(minutes) = env_parse("CARDEENO_SHORT_INTERVAL_MINUTES") {
            config.review.short_interval_minutes = minutes;
        }
        if let Some(minutes) = env_parse("CARDEENO_MEDIUM_INTERVAL_MINUTES") {
            config.review.medium_interval_minutes = minutes;
        }
        if let Some(minutes) = env_parse("CARDEENO_LONG_INTERVAL_MINUTES") {
            config.review.long_interval_minutes = minutes;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
