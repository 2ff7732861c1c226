//! Paired-motor axis tuning configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::units::{Counts, CountsPerSec, Power};

/// Per-motor tuning inside a synchronized pair.
///
/// The two motors of a pair usually differ slightly in friction and wiring,
/// so the slowdown profile is tunable per side.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PairMotorTuning {
    /// Distance from the goal at which deceleration begins, in counts.
    #[serde(rename = "slowdown_counts", default = "default_slowdown")]
    pub slowdown_threshold: Counts,

    /// Floor power commanded near the goal.
    #[serde(default = "default_min_slow_power")]
    pub min_slow_power: Power,
}

impl Default for PairMotorTuning {
    fn default() -> Self {
        Self {
            slowdown_threshold: default_slowdown(),
            min_slow_power: default_min_slow_power(),
        }
    }
}

/// Tuning constants for a synchronized two-motor axis.
#[derive(Debug, Clone, Deserialize)]
pub struct PairTuning {
    /// Human-readable name (max 32 chars).
    #[serde(default)]
    pub name: String<32>,

    /// Acceptance band around each goal, in encoder counts (shared).
    #[serde(rename = "tolerance_counts", default = "default_tolerance")]
    pub tolerance: Counts,

    /// Maximum allowed divergence between the two encoder counts.
    #[serde(rename = "diff_tolerance_counts", default = "default_diff_tolerance")]
    pub diff_tolerance: Counts,

    /// Upper bound on the synchronization speed correction, in counts/sec.
    #[serde(default = "default_speed_balance")]
    pub speed_balance: CountsPerSec,

    /// Fixed homing rate toward the limit switches, in counts/sec.
    #[serde(default = "default_reset_speed")]
    pub reset_speed: CountsPerSec,

    /// Minimum regulated rate (shared by both regulators).
    #[serde(default = "default_min_speed")]
    pub min_speed: CountsPerSec,

    /// Maximum regulated rate (shared by both regulators).
    #[serde(default = "default_max_speed")]
    pub max_speed: CountsPerSec,

    /// First motor's slowdown tuning.
    #[serde(default)]
    pub motor1: PairMotorTuning,

    /// Second motor's slowdown tuning.
    #[serde(default)]
    pub motor2: PairMotorTuning,
}

fn default_tolerance() -> Counts {
    Counts(20)
}

fn default_diff_tolerance() -> Counts {
    Counts(5)
}

fn default_speed_balance() -> CountsPerSec {
    CountsPerSec(30.0)
}

fn default_slowdown() -> Counts {
    Counts(500)
}

fn default_min_slow_power() -> Power {
    Power::new(27)
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

impl Default for PairTuning {
    fn default() -> Self {
        Self {
            name: String::new(),
            tolerance: default_tolerance(),
            diff_tolerance: default_diff_tolerance(),
            speed_balance: default_speed_balance(),
            reset_speed: default_reset_speed(),
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            motor1: PairMotorTuning::default(),
            motor2: PairMotorTuning::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_hold_invariants() {
        let tuning = PairTuning::default();
        assert!(tuning.tolerance < tuning.motor1.slowdown_threshold);
        assert!(tuning.tolerance < tuning.motor2.slowdown_threshold);
        assert!(tuning.diff_tolerance.value() > 0);
        assert!(tuning.speed_balance.value() > 0.0);
    }
}
