//! Rig configuration: one single axis plus one motor pair moved together.

use heapless::String;
use serde::Deserialize;

use super::units::CountsPerSec;

/// Tuning for proportional balancing of a rig's two axes.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RigTuning {
    /// Fractional tolerance on the achieved X:Y progress ratio.
    #[serde(default = "default_proportion_tolerance")]
    pub proportion_tolerance: f32,

    /// Upper bound on the pace correction applied to either axis, in counts/sec.
    #[serde(default = "default_speed_balance")]
    pub speed_balance: CountsPerSec,
}

fn default_proportion_tolerance() -> f32 {
    0.01
}

fn default_speed_balance() -> CountsPerSec {
    CountsPerSec(30.0)
}

impl Default for RigTuning {
    fn default() -> Self {
        Self {
            proportion_tolerance: default_proportion_tolerance(),
            speed_balance: default_speed_balance(),
        }
    }
}

/// Rig configuration from TOML: names the axis and pair it coordinates.
#[derive(Debug, Clone, Deserialize)]
pub struct RigConfig {
    /// Name of the single axis (X).
    pub x: String<32>,

    /// Name of the motor pair (Y).
    pub y: String<32>,

    /// Fractional tolerance on the achieved X:Y progress ratio.
    #[serde(default = "default_proportion_tolerance")]
    pub proportion_tolerance: f32,

    /// Upper bound on the pace correction, in counts/sec.
    #[serde(default = "default_speed_balance")]
    pub speed_balance: CountsPerSec,
}

impl RigConfig {
    /// Extract the balancing tuning.
    pub fn tuning(&self) -> RigTuning {
        RigTuning {
            proportion_tolerance: self.proportion_tolerance,
            speed_balance: self.speed_balance,
        }
    }
}
