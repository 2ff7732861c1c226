//! Synchronized two-motor axis controller.
//!
//! Drives two motor/encoder/switch triples toward their goals while bounding
//! the divergence between the two encoder counts. The synchronizer is a
//! bounded correction on top of each motor's slowdown profile, not a PID: it
//! perturbs the commanded rates within `±speed_balance` and never fights the
//! underlying profile.

use crate::config::units::{Counts, CountsPerSec, Power};
use crate::config::{PairMotorTuning, PairTuning, SystemConfig};
use crate::error::{ConfigError, Error, Result};
use crate::hal::{Clock, Encoder, MotorDrive, Switch};

use super::axis::{apply_pace_bias, profile_speed};
use super::regulator::SpeedRegulator;

/// Drives a motor pair to (possibly different) goals in lockstep.
///
/// Built with [`PairControllerBuilder`].
pub struct PairController<M, E, S, C> {
    reg1: SpeedRegulator<M, E, C>,
    reg2: SpeedRegulator<M, E, C>,
    switch1: S,
    switch2: S,
    goal1: Counts,
    goal2: Counts,
    tolerance: Counts,
    diff_tolerance: Counts,
    speed_balance: CountsPerSec,
    reset_speed: CountsPerSec,
    motor1_tuning: PairMotorTuning,
    motor2_tuning: PairMotorTuning,
    /// Synchronization corrections, recomputed every tick.
    sync_bias1: f32,
    sync_bias2: f32,
    /// External pace correction shared by both motors.
    pace_bias: f32,
    was_pressed1: bool,
    was_pressed2: bool,
}

impl<M, E, S, C> PairController<M, E, S, C>
where
    M: MotorDrive,
    E: Encoder,
    S: Switch,
    C: Clock,
{
    /// Start building a pair controller.
    pub fn builder() -> PairControllerBuilder<M, E, S, C>
    where
        C: Clone,
    {
        PairControllerBuilder::new()
    }

    /// Store new goals for the two motors.
    ///
    /// Returns `true` if both motors are already within tolerance.
    pub fn set(&mut self, goal1: Counts, goal2: Counts) -> bool {
        self.goal1 = goal1;
        self.goal2 = goal2;
        self.pace_bias = 0.0;
        self.sync_bias1 = 0.0;
        self.sync_bias2 = 0.0;
        self.is_done1() && self.is_done2()
    }

    /// Store one shared goal for both motors.
    pub fn set_both(&mut self, goal: Counts) -> bool {
        self.set(goal, goal)
    }

    /// Remaining distance of the first motor.
    pub fn diff1(&self) -> Counts {
        self.goal1 - self.reg1.count()
    }

    /// Remaining distance of the second motor.
    pub fn diff2(&self) -> Counts {
        self.goal2 - self.reg2.count()
    }

    /// Whether the first motor is within tolerance of its goal.
    pub fn is_done1(&self) -> bool {
        self.diff1().abs() <= self.tolerance.abs()
    }

    /// Whether the second motor is within tolerance of its goal.
    pub fn is_done2(&self) -> bool {
        self.diff2().abs() <= self.tolerance.abs()
    }

    /// Whether both measured rates are below the regulated minimum.
    ///
    /// Guards against declaring completion while the axis is still coasting.
    pub fn has_no_speed(&self) -> bool {
        self.reg1.speed().magnitude() < self.reg1.min_speed().value()
            && self.reg2.speed().magnitude() < self.reg2.min_speed().value()
    }

    /// Whether both motors are in tolerance and the axis has stopped moving.
    pub fn is_done(&self) -> bool {
        self.is_done1() && self.is_done2() && self.has_no_speed()
    }

    /// The first motor's slowdown-profile target rate.
    pub fn target_speed1(&self) -> CountsPerSec {
        profile_speed(
            &self.reg1,
            self.diff1(),
            self.tolerance,
            self.motor1_tuning.slowdown_threshold,
            self.motor1_tuning.min_slow_power,
        )
    }

    /// The second motor's slowdown-profile target rate.
    pub fn target_speed2(&self) -> CountsPerSec {
        profile_speed(
            &self.reg2,
            self.diff2(),
            self.tolerance,
            self.motor2_tuning.slowdown_threshold,
            self.motor2_tuning.min_slow_power,
        )
    }

    /// Recompute the synchronization corrections from the count divergence.
    ///
    /// Inside `diff_tolerance` the correction is exactly zero. Outside, the
    /// excess divergence (bounded by `speed_balance`) is split between the
    /// motors: the one lagging along the direction of travel is sped up,
    /// the leader slowed down.
    pub fn balance_speed(&mut self) {
        self.sync_bias1 = 0.0;
        self.sync_bias2 = 0.0;

        let d = (self.reg1.count() - self.reg2.count()).value();
        let excess = d.abs() - self.diff_tolerance.value();
        if excess <= 0 {
            return;
        }

        let correction = (excess as f32).min(self.speed_balance.magnitude());

        // Travel sense decides which count is "ahead": driving reverse, the
        // smaller count leads.
        let remaining = self.diff1().value() as i64 + self.diff2().value() as i64;
        let sense = if remaining < 0 { -1 } else { 1 };
        let motor1_ahead = d as i64 * sense as i64 > 0;

        if motor1_ahead {
            self.move_speed_toward1(CountsPerSec(-correction / 2.0));
            self.move_speed_toward2(CountsPerSec(correction / 2.0));
        } else {
            self.move_speed_toward1(CountsPerSec(correction / 2.0));
            self.move_speed_toward2(CountsPerSec(-correction / 2.0));
        }
    }

    /// Adjust the first motor's synchronization correction.
    pub fn move_speed_toward1(&mut self, delta: CountsPerSec) {
        let bound = self.speed_balance.magnitude();
        self.sync_bias1 = (self.sync_bias1 + delta.value()).clamp(-bound, bound);
    }

    /// Adjust the second motor's synchronization correction.
    pub fn move_speed_toward2(&mut self, delta: CountsPerSec) {
        let bound = self.speed_balance.magnitude();
        self.sync_bias2 = (self.sync_bias2 + delta.value()).clamp(-bound, bound);
    }

    /// Accumulate a shared pace correction, clamped to `±limit`.
    pub fn move_speed_toward(&mut self, delta: CountsPerSec, limit: CountsPerSec) {
        let bound = limit.magnitude();
        self.pace_bias = (self.pace_bias + delta.value()).clamp(-bound, bound);
    }

    /// One control tick: rebalance, profile both rates, regulate both motors.
    pub fn perform_movement(&mut self) -> Result<bool> {
        self.balance_speed();

        let target1 = apply_pace_bias(
            self.target_speed1(),
            self.sync_bias1 + self.pace_bias,
            self.reg1.max_speed(),
        );
        let target2 = apply_pace_bias(
            self.target_speed2(),
            self.sync_bias2 + self.pace_bias,
            self.reg2.max_speed(),
        );

        self.reg1.set_control(target1)?;
        self.reg1.perform_movement()?;
        self.reg2.set_control(target2)?;
        self.reg2.perform_movement()?;

        Ok(self.is_done())
    }

    /// One homing tick for both motors.
    ///
    /// Each side drives toward its switch independently; the overall reset
    /// is complete only when both switches have been pressed and both
    /// counts zeroed.
    pub fn perform_reset(&mut self) -> Result<bool> {
        let homed1 = home_tick(
            &mut self.reg1,
            &mut self.switch1,
            &mut self.was_pressed1,
            self.reset_speed,
        )?;
        let homed2 = home_tick(
            &mut self.reg2,
            &mut self.switch2,
            &mut self.was_pressed2,
            self.reset_speed,
        )?;

        if homed1 && homed2 {
            self.goal1 = Counts::new(0);
            self.goal2 = Counts::new(0);
            return Ok(true);
        }
        Ok(false)
    }

    /// Re-base both encoders relative to the just-reached goals.
    ///
    /// After this, a subsequent [`set`](Self::set) expresses goals relative
    /// to the last stopping point rather than the absolute origin.
    pub fn shift_count(&mut self) {
        let shifted1 = self.reg1.count() - self.goal1;
        self.reg1.encoder().set_count(shifted1);
        let shifted2 = self.reg2.count() - self.goal2;
        self.reg2.encoder().set_count(shifted2);
    }

    /// Raise both regulators' goal magnitudes.
    pub fn increment_speed(&mut self, delta: CountsPerSec) {
        self.reg1.increment_speed(delta);
        self.reg2.increment_speed(delta);
    }

    /// Lower both regulators' goal magnitudes.
    pub fn decrement_speed(&mut self, delta: CountsPerSec) {
        self.reg1.decrement_speed(delta);
        self.reg2.decrement_speed(delta);
    }

    /// Stop both motors and zero the pending goal deltas.
    pub fn stop(&mut self) -> Result<()> {
        self.pace_bias = 0.0;
        self.sync_bias1 = 0.0;
        self.sync_bias2 = 0.0;
        self.goal1 = self.reg1.count();
        self.goal2 = self.reg2.count();
        self.reg1.stop()?;
        self.reg2.stop()?;
        Ok(())
    }

    /// The first motor's encoder count.
    pub fn count1(&self) -> Counts {
        self.reg1.count()
    }

    /// The second motor's encoder count.
    pub fn count2(&self) -> Counts {
        self.reg2.count()
    }

    /// The average of the two encoder counts.
    pub fn count(&self) -> Counts {
        let sum = self.count1().value() as i64 + self.count2().value() as i64;
        Counts::new((sum / 2) as i32)
    }

    /// The first motor's goal.
    pub fn goal1(&self) -> Counts {
        self.goal1
    }

    /// The second motor's goal.
    pub fn goal2(&self) -> Counts {
        self.goal2
    }

    /// The average of the two goals.
    pub fn goal(&self) -> Counts {
        let sum = self.goal1.value() as i64 + self.goal2.value() as i64;
        Counts::new((sum / 2) as i32)
    }

    /// Zero both encoder counts.
    pub fn reset_count(&self) {
        self.reg1.encoder().reset_count();
        self.reg2.encoder().reset_count();
    }

    /// The first embedded regulator.
    pub fn regulator1(&self) -> &SpeedRegulator<M, E, C> {
        &self.reg1
    }

    /// The second embedded regulator.
    pub fn regulator2(&self) -> &SpeedRegulator<M, E, C> {
        &self.reg2
    }
}

/// One homing tick for one side of a pair.
///
/// Returns `true` once this side's switch is pressed; the count is zeroed
/// and the motor stopped on the press transition.
fn home_tick<M, E, C, S>(
    regulator: &mut SpeedRegulator<M, E, C>,
    switch: &mut S,
    was_pressed: &mut bool,
    reset_speed: CountsPerSec,
) -> Result<bool>
where
    M: MotorDrive,
    E: Encoder,
    S: Switch,
    C: Clock,
{
    if switch.is_pressed()? {
        if !*was_pressed {
            regulator.stop()?;
            regulator.encoder().reset_count();
        }
        *was_pressed = true;
        Ok(true)
    } else {
        *was_pressed = false;
        regulator.set_control(CountsPerSec(-reset_speed.magnitude()))?;
        regulator.perform_movement()?;
        Ok(false)
    }
}

/// Builder for [`PairController`].
pub struct PairControllerBuilder<M, E, S, C> {
    motor1: Option<M>,
    motor2: Option<M>,
    encoder1: Option<E>,
    encoder2: Option<E>,
    switch1: Option<S>,
    switch2: Option<S>,
    clock: Option<C>,
    tuning: PairTuning,
    min_power: Power,
}

impl<M, E, S, C> Default for PairControllerBuilder<M, E, S, C>
where
    M: MotorDrive,
    E: Encoder,
    S: Switch,
    C: Clock + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M, E, S, C> PairControllerBuilder<M, E, S, C>
where
    M: MotorDrive,
    E: Encoder,
    S: Switch,
    C: Clock + Clone,
{
    /// Create a new builder with default tuning.
    pub fn new() -> Self {
        Self {
            motor1: None,
            motor2: None,
            encoder1: None,
            encoder2: None,
            switch1: None,
            switch2: None,
            clock: None,
            tuning: PairTuning::default(),
            min_power: Power::ZERO,
        }
    }

    /// Set the first motor.
    pub fn motor1(mut self, motor: M) -> Self {
        self.motor1 = Some(motor);
        self
    }

    /// Set the second motor.
    pub fn motor2(mut self, motor: M) -> Self {
        self.motor2 = Some(motor);
        self
    }

    /// Set the first encoder handle.
    pub fn encoder1(mut self, encoder: E) -> Self {
        self.encoder1 = Some(encoder);
        self
    }

    /// Set the second encoder handle.
    pub fn encoder2(mut self, encoder: E) -> Self {
        self.encoder2 = Some(encoder);
        self
    }

    /// Set the first homing switch.
    pub fn switch1(mut self, switch: S) -> Self {
        self.switch1 = Some(switch);
        self
    }

    /// Set the second homing switch.
    pub fn switch2(mut self, switch: S) -> Self {
        self.switch2 = Some(switch);
        self
    }

    /// Set the clock shared by both regulators.
    pub fn clock(mut self, clock: C) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a complete tuning set.
    pub fn tuning(mut self, tuning: &PairTuning) -> Self {
        self.tuning = tuning.clone();
        self
    }

    /// Use the tuning of a named pair from a system configuration.
    pub fn from_config(mut self, config: &SystemConfig, pair_name: &str) -> Result<Self> {
        let tuning = config.pair(pair_name).ok_or_else(|| {
            Error::Config(ConfigError::PairNotFound(
                heapless::String::try_from(pair_name).unwrap_or_default(),
            ))
        })?;
        self.tuning = tuning.clone();
        Ok(self)
    }

    /// Override the shared acceptance band.
    pub fn tolerance(mut self, tolerance: Counts) -> Self {
        self.tuning.tolerance = tolerance;
        self
    }

    /// Override the divergence tolerance.
    pub fn diff_tolerance(mut self, tolerance: Counts) -> Self {
        self.tuning.diff_tolerance = tolerance;
        self
    }

    /// Override the synchronization correction bound.
    pub fn speed_balance(mut self, balance: CountsPerSec) -> Self {
        self.tuning.speed_balance = balance;
        self
    }

    /// Override the homing rate.
    pub fn reset_speed(mut self, speed: CountsPerSec) -> Self {
        self.tuning.reset_speed = speed;
        self
    }

    /// Override the shared regulator speed bounds.
    pub fn speed_bounds(mut self, min: CountsPerSec, max: CountsPerSec) -> Self {
        self.tuning.min_speed = min;
        self.tuning.max_speed = max;
        self
    }

    /// Override the first motor's slowdown tuning.
    pub fn motor1_tuning(mut self, tuning: PairMotorTuning) -> Self {
        self.tuning.motor1 = tuning;
        self
    }

    /// Override the second motor's slowdown tuning.
    pub fn motor2_tuning(mut self, tuning: PairMotorTuning) -> Self {
        self.tuning.motor2 = tuning;
        self
    }

    /// Set both regulators' minimum moving power.
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
    pub fn build(self) -> Result<PairController<M, E, S, C>> {
        crate::config::validation::validate_pair(&self.tuning)?;

        let motor1 = self
            .motor1
            .ok_or(Error::Config(ConfigError::MissingHardware("motor1")))?;
        let motor2 = self
            .motor2
            .ok_or(Error::Config(ConfigError::MissingHardware("motor2")))?;
        let encoder1 = self
            .encoder1
            .ok_or(Error::Config(ConfigError::MissingHardware("encoder1")))?;
        let encoder2 = self
            .encoder2
            .ok_or(Error::Config(ConfigError::MissingHardware("encoder2")))?;
        let switch1 = self
            .switch1
            .ok_or(Error::Config(ConfigError::MissingHardware("switch1")))?;
        let switch2 = self
            .switch2
            .ok_or(Error::Config(ConfigError::MissingHardware("switch2")))?;
        let clock = self
            .clock
            .ok_or(Error::Config(ConfigError::MissingHardware("clock")))?;

        let mut reg1 = SpeedRegulator::new(
            motor1,
            encoder1,
            clock.clone(),
            self.tuning.min_speed,
            self.tuning.max_speed,
        );
        reg1.set_min_power(self.min_power);

        let mut reg2 = SpeedRegulator::new(
            motor2,
            encoder2,
            clock,
            self.tuning.min_speed,
            self.tuning.max_speed,
        );
        reg2.set_min_power(self.min_power);

        let goal1 = reg1.count();
        let goal2 = reg2.count();
        Ok(PairController {
            reg1,
            reg2,
            switch1,
            switch2,
            goal1,
            goal2,
            tolerance: self.tuning.tolerance,
            diff_tolerance: self.tuning.diff_tolerance,
            speed_balance: self.tuning.speed_balance,
            reset_speed: self.tuning.reset_speed,
            motor1_tuning: self.tuning.motor1,
            motor2_tuning: self.tuning.motor2,
            sync_bias1: 0.0,
            sync_bias2: 0.0,
            pace_bias: 0.0,
            was_pressed1: false,
            was_pressed2: false,
        })
    }
}
