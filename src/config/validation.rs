//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::axis::AxisTuning;
use super::pair::PairTuning;
use super::rig::RigConfig;
use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Every tolerance band sits strictly inside its slowdown threshold
/// - Speed bounds satisfy 0 < min < max
/// - Divergence tolerances and balance bounds are positive
/// - Rigs reference existing axes and pairs
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_, axis) in config.axes.iter() {
        validate_axis(axis)?;
    }

    for (_, pair) in config.pairs.iter() {
        validate_pair(pair)?;
    }

    for (_, rig) in config.rigs.iter() {
        validate_rig(rig, config)?;
    }

    Ok(())
}

pub(crate) fn validate_axis(tuning: &AxisTuning) -> Result<()> {
    if tuning.tolerance >= tuning.slowdown_threshold {
        return Err(Error::Config(ConfigError::InvalidToleranceBand {
            tolerance: tuning.tolerance.value(),
            slowdown: tuning.slowdown_threshold.value(),
        }));
    }

    validate_speed_bounds(tuning.min_speed.value(), tuning.max_speed.value())?;

    if tuning.reset_speed.value() <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidResetSpeed(
            tuning.reset_speed.value(),
        )));
    }

    Ok(())
}

pub(crate) fn validate_pair(tuning: &PairTuning) -> Result<()> {
    for motor in [&tuning.motor1, &tuning.motor2] {
        if tuning.tolerance >= motor.slowdown_threshold {
            return Err(Error::Config(ConfigError::InvalidToleranceBand {
                tolerance: tuning.tolerance.value(),
                slowdown: motor.slowdown_threshold.value(),
            }));
        }
    }

    validate_speed_bounds(tuning.min_speed.value(), tuning.max_speed.value())?;

    if tuning.diff_tolerance.value() <= 0 {
        return Err(Error::Config(ConfigError::InvalidDiffTolerance(
            tuning.diff_tolerance.value(),
        )));
    }

    if tuning.speed_balance.value() <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidSpeedBalance(
            tuning.speed_balance.value(),
        )));
    }

    if tuning.reset_speed.value() <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidResetSpeed(
            tuning.reset_speed.value(),
        )));
    }

    Ok(())
}

fn validate_rig(rig: &RigConfig, config: &SystemConfig) -> Result<()> {
    if config.axis(rig.x.as_str()).is_none() {
        return Err(Error::Config(ConfigError::AxisNotFound(rig.x.clone())));
    }

    if config.pair(rig.y.as_str()).is_none() {
        return Err(Error::Config(ConfigError::PairNotFound(rig.y.clone())));
    }

    if rig.proportion_tolerance <= 0.0 || rig.proportion_tolerance >= 1.0 {
        return Err(Error::Config(ConfigError::InvalidProportionTolerance(
            rig.proportion_tolerance,
        )));
    }

    if rig.speed_balance.value() <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidSpeedBalance(
            rig.speed_balance.value(),
        )));
    }

    Ok(())
}

fn validate_speed_bounds(min: f32, max: f32) -> Result<()> {
    if min <= 0.0 || min >= max {
        return Err(Error::Config(ConfigError::InvalidSpeedBounds { min, max }));
    }
    Ok(())
}
