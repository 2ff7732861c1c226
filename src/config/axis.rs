//! Single-axis tuning configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::units::{Counts, CountsPerSec, Power};

/// Tuning constants for one closed-loop axis.
///
/// All values have compiled-in defaults and can be overridden per axis in
/// the configuration file or through builder setters.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisTuning {
    /// Human-readable name (max 32 chars).
    #[serde(default)]
    pub name: String<32>,

    /// Acceptance band around the goal, in encoder counts.
    #[serde(rename = "tolerance_counts", default = "default_tolerance")]
    pub tolerance: Counts,

    /// Distance from the goal at which deceleration begins, in counts.
    #[serde(rename = "slowdown_counts", default = "default_slowdown")]
    pub slowdown_threshold: Counts,

    /// Floor power commanded near the goal.
    #[serde(default = "default_min_slow_power")]
    pub min_slow_power: Power,

    /// Fixed homing rate toward the limit switch, in counts/sec.
    #[serde(default = "default_reset_speed")]
    pub reset_speed: CountsPerSec,

    /// Minimum regulated rate; goals below this stop the motor instead.
    #[serde(default = "default_min_speed")]
    pub min_speed: CountsPerSec,

    /// Maximum regulated rate, commanded outside the slowdown band.
    #[serde(default = "default_max_speed")]
    pub max_speed: CountsPerSec,
}

fn default_tolerance() -> Counts {
    Counts(10)
}

fn default_slowdown() -> Counts {
    Counts(200)
}

fn default_min_slow_power() -> Power {
    Power::new(20)
}

fn default_reset_speed() -> CountsPerSec {
    CountsPerSec(120.0)
}

fn default_min_speed() -> CountsPerSec {
    CountsPerSec(50.0)
}

fn default_max_speed() -> CountsPerSec {
    CountsPerSec(400.0)
}

impl Default for AxisTuning {
    fn default() -> Self {
        Self {
            name: String::new(),
            tolerance: default_tolerance(),
            slowdown_threshold: default_slowdown(),
            min_slow_power: default_min_slow_power(),
            reset_speed: default_reset_speed(),
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
        }
    }
}
