//! Cache sizing configuration

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default share of the cache reserved for entries seen only once
pub const DEFAULT_RECENT_RATIO: f64 = 0.20;

/// Default number of ghost entries, as a share of the cache size
pub const DEFAULT_GHOST_RATIO: f64 = 0.80;

fn default_recent_ratio() -> f64 {
    DEFAULT_RECENT_RATIO
}

fn default_ghost_ratio() -> f64 {
    DEFAULT_GHOST_RATIO
}

/// Sizing parameters for a [`TwoQueueCache`](crate::TwoQueueCache)
///
/// Omitted ratios deserialize to their defaults:
///
/// ```
/// use twoqcache::TwoQueueConfig;
///
/// let config: TwoQueueConfig = serde_json::from_str(r#"{"size": 128}"#).unwrap();
/// assert_eq!(config, TwoQueueConfig::new(128));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwoQueueConfig {
    /// Shared budget for recent and frequent entries
    pub size: usize,

    /// Target share of `size` for entries seen once
    #[serde(default = "default_recent_ratio")]
    pub recent_ratio: f64,

    /// Ghost list capacity as a share of `size`
    #[serde(default = "default_ghost_ratio")]
    pub ghost_ratio: f64,
}

impl TwoQueueConfig {
    /// Config with the default ratios
    pub fn new(size: usize) -> Self {
        Self {
            size,
            recent_ratio: DEFAULT_RECENT_RATIO,
            ghost_ratio: DEFAULT_GHOST_RATIO,
        }
    }

    /// Set the recent ratio
    pub fn with_recent_ratio(mut self, ratio: f64) -> Self {
        self.recent_ratio = ratio;
        self
    }

    /// Set the ghost ratio
    pub fn with_ghost_ratio(mut self, ratio: f64) -> Self {
        self.ghost_ratio = ratio;
        self
    }

    /// Check size and ratios
    ///
    /// # Returns
    /// * `Err(Error::InvalidSize)` - if `size` is 0
    /// * `Err(Error::InvalidRatio)` - if a ratio is outside `[0.0, 1.0]` or NaN
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidSize(self.size));
        }
        check_ratio("recent", self.recent_ratio)?;
        check_ratio("ghost", self.ghost_ratio)
    }

    /// Target number of once-seen entries, `floor(size * recent_ratio)`
    pub fn recent_size(&self) -> usize {
        (self.size as f64 * self.recent_ratio) as usize
    }

    /// Ghost list capacity, `floor(size * ghost_ratio)`
    pub fn ghost_size(&self) -> usize {
        (self.size as f64 * self.ghost_ratio) as usize
    }
}

fn check_ratio(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidRatio { name, value })
    }
}
