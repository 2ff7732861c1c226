//! Single-axis position controller.

use libm::fabsf;

use crate::config::units::{Counts, CountsPerSec, Power};
use crate::config::{AxisTuning, SystemConfig};
use crate::error::{ConfigError, Error, Result};
use crate::hal::{Clock, Encoder, MotorDrive, Switch};

use super::regulator::SpeedRegulator;

/// Drives one motor/encoder/switch triple to a goal position.
///
/// The commanded rate follows a slowdown profile: full speed far from the
/// goal, linear deceleration inside the slowdown band, stop inside the
/// tolerance band. Built with [`AxisControllerBuilder`].
pub struct AxisController<M, E, S, C> {
    regulator: SpeedRegulator<M, E, C>,
    switch: S,
    goal: Counts,
    tolerance: Counts,
    slowdown_threshold: Counts,
    min_slow_power: Power,
    reset_speed: CountsPerSec,
    /// External pace correction, in counts/sec. Positive speeds the axis up.
    pace_bias: f32,
    /// Switch level seen by the previous reset tick.
    was_pressed: bool,
}

impl<M, E, S, C> AxisController<M, E, S, C>
where
    M: MotorDrive,
    E: Encoder,
    S: Switch,
    C: Clock,
{
    /// Start building an axis controller.
    pub fn builder() -> AxisControllerBuilder<M, E, S, C> {
        AxisControllerBuilder::new()
    }

    /// Store a new goal position.
    ///
    /// Returns `true` if the axis is already within tolerance of the new
    /// goal, in which case no movement is needed. Retargeting while a move
    /// is in progress is allowed; the next tick follows the new profile.
    pub fn set(&mut self, goal: Counts) -> bool {
        self.goal = goal;
        self.pace_bias = 0.0;
        self.is_done()
    }

    /// Remaining distance `goal - count`; the sign is the required direction.
    pub fn diff(&self) -> Counts {
        self.goal - self.regulator.count()
    }

    /// Whether the axis is within the tolerance band of its goal.
    pub fn is_done(&self) -> bool {
        self.diff().abs() <= self.tolerance.abs()
    }

    /// The slowdown-profile target rate for the current distance.
    pub fn target_speed(&self) -> CountsPerSec {
        let diff = self.diff();
        profile_speed(
            &self.regulator,
            diff,
            self.tolerance,
            self.slowdown_threshold,
            self.min_slow_power,
        )
    }

    /// One control tick: profile the rate, regulate, report completion.
    pub fn perform_movement(&mut self) -> Result<bool> {
        let target = self.biased(self.target_speed());
        self.regulator.set_control(target)?;
        self.regulator.perform_movement()?;
        Ok(self.is_done())
    }

    /// One homing tick.
    ///
    /// Drives toward the switch at the configured reset speed while it is
    /// unpressed. Returns `true` only on the tick the switch transitions
    /// unpressed-to-pressed; on that tick the motor stops and the count is
    /// zeroed. There is no internal timeout: if the switch never presses,
    /// the caller must bound retries.
    pub fn perform_reset(&mut self) -> Result<bool> {
        if self.switch.is_pressed()? {
            let arrived = !self.was_pressed;
            self.was_pressed = true;
            if arrived {
                self.stop()?;
                self.regulator.encoder().reset_count();
                self.goal = Counts::new(0);
                return Ok(true);
            }
            Ok(false)
        } else {
            self.was_pressed = false;
            let rate = CountsPerSec(-self.reset_speed.magnitude());
            self.regulator.set_control(rate)?;
            self.regulator.perform_movement()?;
            Ok(false)
        }
    }

    /// Accumulate a pace correction, clamped to `±limit`.
    ///
    /// The correction raises (positive) or lowers (negative) the commanded
    /// rate magnitude while a move is in progress.
    pub fn move_speed_toward(&mut self, delta: CountsPerSec, limit: CountsPerSec) {
        let bound = limit.magnitude();
        self.pace_bias = (self.pace_bias + delta.value()).clamp(-bound, bound);
    }

    /// Raise the regulator's goal magnitude.
    pub fn increment_speed(&mut self, delta: CountsPerSec) {
        self.regulator.increment_speed(delta);
    }

    /// Lower the regulator's goal magnitude.
    pub fn decrement_speed(&mut self, delta: CountsPerSec) {
        self.regulator.decrement_speed(delta);
    }

    /// Stop the motor and zero the pending goal delta.
    pub fn stop(&mut self) -> Result<()> {
        self.pace_bias = 0.0;
        self.goal = self.regulator.count();
        self.regulator.stop()?;
        Ok(())
    }

    /// The current encoder count.
    pub fn count(&self) -> Counts {
        self.regulator.count()
    }

    /// The current goal position.
    pub fn goal(&self) -> Counts {
        self.goal
    }

    /// The embedded speed regulator.
    pub fn regulator(&self) -> &SpeedRegulator<M, E, C> {
        &self.regulator
    }

    /// Release the motor, encoder, switch, and clock.
    pub fn into_parts(self) -> (M, E, S, C) {
        let (motor, encoder, clock) = self.regulator.into_parts();
        (motor, encoder, self.switch, clock)
    }

    fn biased(&self, target: CountsPerSec) -> CountsPerSec {
        apply_pace_bias(target, self.pace_bias, self.regulator.max_speed())
    }
}

/// Slowdown profile shared by the single-axis and pair controllers.
pub(crate) fn profile_speed<M, E, C>(
    regulator: &SpeedRegulator<M, E, C>,
    diff: Counts,
    tolerance: Counts,
    slowdown_threshold: Counts,
    min_slow_power: Power,
) -> CountsPerSec
where
    M: MotorDrive,
    E: Encoder,
    C: Clock,
{
    let distance = diff.abs() as i32;
    if distance <= tolerance.value() {
        return CountsPerSec::ZERO;
    }

    let sign = if diff.value() < 0 { -1.0 } else { 1.0 };
    let max = regulator.max_speed().value();

    if distance >= slowdown_threshold.value() {
        return CountsPerSec(sign * max);
    }

    // Taper from max speed at the threshold down to the floor power's
    // equivalent rate at the tolerance boundary.
    let floor = regulator.speed_for_power(min_slow_power).value();
    let fraction = (distance - tolerance.value()) as f32
        / (slowdown_threshold.value() - tolerance.value()) as f32;
    CountsPerSec(sign * (floor + fraction * (max - floor)))
}

/// Apply a pace correction to a profiled rate.
///
/// A zero target stays zero: a finished or stopped axis is never pushed by
/// its pace bias.
pub(crate) fn apply_pace_bias(
    target: CountsPerSec,
    bias: f32,
    max_speed: CountsPerSec,
) -> CountsPerSec {
    if target.value() == 0.0 {
        return target;
    }
    let sign = if target.value() < 0.0 { -1.0 } else { 1.0 };
    let magnitude = (target.magnitude() + bias).clamp(0.0, fabsf(max_speed.value()));
    CountsPerSec(sign * magnitude)
}

/// Builder for [`AxisController`].
pub struct AxisControllerBuilder<M, E, S, C> {
    motor: Option<M>,
    encoder: Option<E>,
    switch: Option<S>,
    clock: Option<C>,
    tuning: AxisTuning,
    min_power: Power,
}

impl<M, E, S, C> Default for AxisControllerBuilder<M, E, S, C>
where
    M: MotorDrive,
    E: Encoder,
    S: Switch,
    C: Clock,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M, E, S, C> AxisControllerBuilder<M, E, S, C>
where
    M: MotorDrive,
    E: Encoder,
    S: Switch,
    C: Clock,
{
    /// Create a new builder with default tuning.
    pub fn new() -> Self {
        Self {
            motor: None,
            encoder: None,
            switch: None,
            clock: None,
            tuning: AxisTuning::default(),
            min_power: Power::ZERO,
        }
    }

    /// Set the motor.
    pub fn motor(mut self, motor: M) -> Self {
        self.motor = Some(motor);
        self
    }

    /// Set the encoder handle.
    pub fn encoder(mut self, encoder: E) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Set the homing switch.
    pub fn switch(mut self, switch: S) -> Self {
        self.switch = Some(switch);
        self
    }

    /// Set the clock.
    pub fn clock(mut self, clock: C) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a complete tuning set.
    pub fn tuning(mut self, tuning: &AxisTuning) -> Self {
        self.tuning = tuning.clone();
        self
    }

    /// Use the tuning of a named axis from a system configuration.
    pub fn from_config(mut self, config: &SystemConfig, axis_name: &str) -> Result<Self> {
        let tuning = config.axis(axis_name).ok_or_else(|| {
            Error::Config(ConfigError::AxisNotFound(
                heapless::String::try_from(axis_name).unwrap_or_default(),
            ))
        })?;
        self.tuning = tuning.clone();
        Ok(self)
    }

    /// Override the acceptance band.
    pub fn tolerance(mut self, tolerance: Counts) -> Self {
        self.tuning.tolerance = tolerance;
        self
    }

    /// Override the slowdown threshold.
    pub fn slowdown_threshold(mut self, threshold: Counts) -> Self {
        self.tuning.slowdown_threshold = threshold;
        self
    }

    /// Override the near-goal floor power.
    pub fn min_slow_power(mut self, power: Power) -> Self {
        self.tuning.min_slow_power = power;
        self
    }

    /// Override the homing rate.
    pub fn reset_speed(mut self, speed: CountsPerSec) -> Self {
        self.tuning.reset_speed = speed;
        self
    }

    /// Override the regulator speed bounds.
    pub fn speed_bounds(mut self, min: CountsPerSec, max: CountsPerSec) -> Self {
        self.tuning.min_speed = min;
        self.tuning.max_speed = max;
        self
    }

    /// Set the regulator's minimum moving power.
    pub fn min_power(mut self, power: Power) -> Self {
        self.min_power = power;
        self
    }

    /// Build the controller.
    ///
    /// # Errors
    ///
    /// Returns an error if hardware handles are missing or the tuning
    /// violates its invariants.
    pub fn build(self) -> Result<AxisController<M, E, S, C>> {
        crate::config::validation::validate_axis(&self.tuning)?;

        let motor = self
            .motor
            .ok_or(Error::Config(ConfigError::MissingHardware("motor")))?;
        let encoder = self
            .encoder
            .ok_or(Error::Config(ConfigError::MissingHardware("encoder")))?;
        let switch = self
            .switch
            .ok_or(Error::Config(ConfigError::MissingHardware("switch")))?;
        let clock = self
            .clock
            .ok_or(Error::Config(ConfigError::MissingHardware("clock")))?;

        let mut regulator = SpeedRegulator::new(
            motor,
            encoder,
            clock,
            self.tuning.min_speed,
            self.tuning.max_speed,
        );
        regulator.set_min_power(self.min_power);

        let goal = regulator.count();
        Ok(AxisController {
            regulator,
            switch,
            goal,
            tolerance: self.tuning.tolerance,
            slowdown_threshold: self.tuning.slowdown_threshold,
            min_slow_power: self.tuning.min_slow_power,
            reset_speed: self.tuning.reset_speed,
            pace_bias: 0.0,
            was_pressed: false,
        })
    }
}
