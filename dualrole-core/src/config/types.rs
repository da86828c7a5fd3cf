//! Coordinator configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// VBUS voltage restored after a source negotiation (mV)
pub const DEFAULT_SOURCE_MV: u16 = 5024;

/// Settle delays and the display idle timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timing {
    /// Delay after selecting the VCC rail on a backfeed, before re-probing
    pub backfeed_settle_ms: u32,
    /// Delay before the final status read and repaint of a backfeed
    pub backfeed_repaint_ms: u32,
    /// Idle time before the display is put to sleep, 0 keeps it on
    pub display_sleep_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            backfeed_settle_ms: 100,
            backfeed_repaint_ms: 500,
            display_sleep_ms: 30_000,
        }
    }
}

/// Rail monitoring parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorConfig {
    /// Delay between two measurements
    pub poll_interval_ms: u32,
    /// Consecutive in-tolerance readings that count as stable
    pub stable_samples: u8,
    /// Maximum difference between consecutive stable readings (mV)
    pub tolerance_mv: u16,
    /// Upper bound on measurements per monitoring run
    pub max_polls: u8,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            stable_samples: 3,
            tolerance_mv: 100,
            max_polls: 40,
        }
    }
}

/// Complete coordinator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinatorConfig {
    pub timing: Timing,
    pub monitor: MonitorConfig,
    /// VBUS voltage restored after a source negotiation (mV)
    pub default_source_mv: u16,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            monitor: MonitorConfig::default(),
            default_source_mv: DEFAULT_SOURCE_MV,
        }
    }
}
