//! Motion system facade for configuration-driven setups.
//!
//! Holds a validated [`SystemConfig`] and answers tuning lookups by name.
//! The controllers themselves are owned by the caller, since their hardware
//! types are generic.

use heapless::String;

use crate::config::{AxisTuning, PairTuning, RigConfig, RigTuning, SystemConfig};
use crate::error::{ConfigError, Error, Result};

/// A facade over a system configuration.
///
/// # Example
///
/// ```rust,ignore
/// use servo_motion::{parse_config, MotionSystem};
///
/// let config = parse_config(CONFIG_TOML)?;
/// let system = MotionSystem::from_config(config);
///
/// let x_tuning = system.axis_tuning("x")?;
/// let rig_tuning = system.rig_tuning("gantry")?;
/// ```
pub struct MotionSystem {
    config: SystemConfig,
}

impl MotionSystem {
    /// Create a motion system from configuration.
    pub fn from_config(config: SystemConfig) -> Self {
        Self { config }
    }

    /// The underlying configuration.
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Whether an axis name exists in the configuration.
    pub fn has_axis(&self, name: &str) -> bool {
        self.config.axis(name).is_some()
    }

    /// Whether a pair name exists in the configuration.
    pub fn has_pair(&self, name: &str) -> bool {
        self.config.pair(name).is_some()
    }

    /// Whether a rig name exists in the configuration.
    pub fn has_rig(&self, name: &str) -> bool {
        self.config.rig(name).is_some()
    }

    /// Get an axis tuning by name.
    pub fn axis_tuning(&self, name: &str) -> Result<&AxisTuning> {
        self.config
            .axis(name)
            .ok_or_else(|| Error::Config(ConfigError::AxisNotFound(name_of(name))))
    }

    /// Get a pair tuning by name.
    pub fn pair_tuning(&self, name: &str) -> Result<&PairTuning> {
        self.config
            .pair(name)
            .ok_or_else(|| Error::Config(ConfigError::PairNotFound(name_of(name))))
    }

    /// Get a rig configuration by name.
    pub fn rig_config(&self, name: &str) -> Result<&RigConfig> {
        self.config
            .rig(name)
            .ok_or_else(|| Error::Config(ConfigError::RigNotFound(name_of(name))))
    }

    /// Get a rig's balancing tuning by name.
    pub fn rig_tuning(&self, name: &str) -> Result<RigTuning> {
        self.rig_config(name).map(RigConfig::tuning)
    }

    /// The tunings of the axis and pair a rig coordinates.
    pub fn rig_members(&self, name: &str) -> Result<(&AxisTuning, &PairTuning)> {
        let rig = self.rig_config(name)?;
        let axis = self.axis_tuning(rig.x.as_str())?;
        let pair = self.pair_tuning(rig.y.as_str())?;
        Ok((axis, pair))
    }

    /// List all configured axis names.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.config.axis_names()
    }

    /// List all configured pair names.
    pub fn pair_names(&self) -> impl Iterator<Item = &str> {
        self.config.pair_names()
    }
}

fn name_of(name: &str) -> String<32> {
    String::try_from(name).unwrap_or_default()
}
