//! Cache strategy presets.
//!
//! A strategy is a named bundle of freshness settings attached to each
//! endpoint. Nothing here stores responses; the client reads `retry` and
//! pollers read `refetch_interval`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const SECOND: Duration = Duration::from_secs(1);
const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// How often an endpoint's data changes upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
    /// Vessel positions, sailing space: changes every few seconds.
    Realtime,
    /// Alerts, travel times, flows: changes every minute or so.
    Minute,
    /// Conditions and schedules for the day.
    Hourly,
    /// Date ranges, route lists.
    Daily,
    /// Reference data such as vessel and terminal basics.
    Static,
}

/// Freshness settings for one [`CacheStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePreset {
    /// Age after which data is considered stale.
    pub stale_time: Duration,
    /// How long unused data may be kept.
    pub gc_time: Duration,
    /// Polling period, if the data should be refreshed in the background.
    pub refetch_interval: Option<Duration>,
    /// Number of extra attempts after a retryable failure.
    pub retry: u32,
}

impl CacheStrategy {
    /// Every strategy, from most to least volatile.
    pub const ALL: [Self; 5] = [
        Self::Realtime,
        Self::Minute,
        Self::Hourly,
        Self::Daily,
        Self::Static,
    ];

    /// Returns the preset for this strategy.
    #[must_use]
    pub const fn preset(self) -> CachePreset {
        match self {
            Self::Realtime => CachePreset {
                stale_time: SECOND.saturating_mul(5),
                gc_time: MINUTE,
                refetch_interval: Some(SECOND.saturating_mul(5)),
                retry: 1,
            },
            Self::Minute => CachePreset {
                stale_time: SECOND.saturating_mul(30),
                gc_time: MINUTE.saturating_mul(5),
                refetch_interval: Some(MINUTE),
                retry: 2,
            },
            Self::Hourly => CachePreset {
                stale_time: MINUTE.saturating_mul(30),
                gc_time: HOUR.saturating_mul(2),
                refetch_interval: Some(HOUR),
                retry: 3,
            },
            Self::Daily => CachePreset {
                stale_time: HOUR.saturating_mul(12),
                gc_time: DAY.saturating_mul(2),
                refetch_interval: Some(DAY),
                retry: 3,
            },
            Self::Static => CachePreset {
                stale_time: DAY.saturating_mul(7),
                gc_time: DAY.saturating_mul(14),
                refetch_interval: None,
                retry: 3,
            },
        }
    }

    /// Lowercase tag used in configuration and generated documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::Minute => "minute",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Static => "static",
        }
    }
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown cache strategy: {s}"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_presets_are_ordered_by_volatility() {
        // Arrange
        let stale: Vec<Duration> = CacheStrategy::ALL
            .iter()
            .map(|s| s.preset().stale_time)
            .collect();

        // Act & Assert
        assert!(stale.windows(2).all(|w| w.first() < w.get(1)));
    }

    #[test]
    fn test_static_never_refetches() {
        // Arrange & Act
        let preset = CacheStrategy::Static.preset();

        // Assert
        assert!(preset.refetch_interval.is_none());
    }

    #[test]
    fn test_realtime_preset() {
        // Arrange & Act
        let preset = CacheStrategy::Realtime.preset();

        // Assert
        assert_eq!(preset.refetch_interval, Some(Duration::from_secs(5)));
        assert_eq!(preset.retry, 1);
    }

    #[test]
    fn test_from_str_round_trip() {
        // Arrange & Act & Assert
        for strategy in CacheStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<CacheStrategy>().unwrap(), strategy);
        }
        assert_eq!("HOURLY".parse::<CacheStrategy>().unwrap(), CacheStrategy::Hourly);
        assert!("weekly".parse::<CacheStrategy>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        // Arrange & Act
        let json = serde_json::to_string(&CacheStrategy::Realtime).unwrap();

        // Assert
        assert_eq!(json, r#""realtime""#);
    }
}
