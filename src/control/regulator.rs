//! Per-motor speed regulation.
//!
//! Converts an encoder-rate goal into a power command: a linear feed-forward
//! map from the legal speed range into the legal power range, plus a one-step
//! closed-loop trim from comparing the measured rate against the goal.

use crate::config::units::{Counts, CountsPerSec, Power};
use crate::error::MotorError;
use crate::hal::{Clock, Direction, Encoder, MotorDrive};

/// Closed-loop rate regulator for one motor/encoder pair.
///
/// Owns its motor, encoder handle, and clock exclusively; ownership is fixed
/// at construction. The regulator is a per-tick sampler: call
/// [`perform_movement`](Self::perform_movement) once per control tick.
pub struct SpeedRegulator<M, E, C> {
    motor: M,
    encoder: E,
    clock: C,
    /// Time of the previous speed sample, in microseconds.
    prev_time: u64,
    /// Encoder count at the previous sample.
    prev_count: Counts,
    /// Previously computed speed.
    prev_speed: CountsPerSec,
    /// Target rate; sign encodes direction.
    goal: CountsPerSec,
    /// Accumulated closed-loop power correction.
    trim: i32,
    /// Minimum power that produces motion.
    min_power: Power,
    /// Lower speed bound; goals below this stop the motor.
    min_speed: CountsPerSec,
    /// Upper speed bound.
    max_speed: CountsPerSec,
}

impl<M, E, C> SpeedRegulator<M, E, C>
where
    M: MotorDrive,
    E: Encoder,
    C: Clock,
{
    /// Create a regulator with the given speed bounds.
    pub fn new(
        motor: M,
        encoder: E,
        mut clock: C,
        min_speed: CountsPerSec,
        max_speed: CountsPerSec,
    ) -> Self {
        let now = clock.now_micros();
        let count = encoder.count();
        Self {
            motor,
            encoder,
            clock,
            prev_time: now,
            prev_count: count,
            prev_speed: CountsPerSec::ZERO,
            goal: CountsPerSec::ZERO,
            trim: 0,
            min_power: Power::ZERO,
            min_speed,
            max_speed,
        }
    }

    /// Set the minimum power that produces motion (the floor of the power map).
    pub fn set_min_power(&mut self, power: Power) {
        self.min_power = power;
    }

    /// Set the lower speed bound.
    pub fn set_min_speed(&mut self, speed: CountsPerSec) {
        self.min_speed = speed;
    }

    /// Set the upper speed bound.
    pub fn set_max_speed(&mut self, speed: CountsPerSec) {
        self.max_speed = speed;
    }

    /// The lower speed bound.
    pub fn min_speed(&self) -> CountsPerSec {
        self.min_speed
    }

    /// The upper speed bound.
    pub fn max_speed(&self) -> CountsPerSec {
        self.max_speed
    }

    /// Sample the encoder rate and advance the sampler state.
    ///
    /// Returns `(count - prev_count) / (now - prev_time)` in counts/sec.
    /// Calling this twice within one tick yields a zero reading, since no
    /// time has passed. A non-monotonic clock reading short-circuits to
    /// zero and resynchronizes the sampler.
    pub fn calc_speed(&mut self) -> CountsPerSec {
        let now = self.clock.now_micros();
        let count = self.encoder.count();

        if now <= self.prev_time {
            self.prev_time = now;
            self.prev_count = count;
            self.prev_speed = CountsPerSec::ZERO;
            return self.prev_speed;
        }

        let dt_secs = (now - self.prev_time) as f32 / 1_000_000.0;
        let delta = (count - self.prev_count).value() as f32;

        self.prev_time = now;
        self.prev_count = count;
        self.prev_speed = CountsPerSec(delta / dt_secs);
        self.prev_speed
    }

    /// Set the target rate; the sign selects direction.
    pub fn set_speed(&mut self, goal: CountsPerSec) {
        self.goal = goal;
    }

    /// Set the target rate and immediately nudge power toward it.
    pub fn set_control(&mut self, goal: CountsPerSec) -> Result<(), MotorError> {
        self.set_speed(goal);
        self.command()
    }

    /// Raise the goal magnitude without a power discontinuity.
    pub fn increment_speed(&mut self, delta: CountsPerSec) {
        let sign = if self.goal.value() < 0.0 { -1.0 } else { 1.0 };
        self.goal = CountsPerSec(self.goal.value() + sign * delta.magnitude());
    }

    /// Lower the goal magnitude without a power discontinuity. Floors at zero.
    pub fn decrement_speed(&mut self, delta: CountsPerSec) {
        let sign = if self.goal.value() < 0.0 { -1.0 } else { 1.0 };
        let magnitude = (self.goal.magnitude() - delta.magnitude()).max(0.0);
        self.goal = CountsPerSec(sign * magnitude);
    }

    /// One regulation tick: sample the rate, adjust the trim, command power.
    pub fn perform_movement(&mut self) -> Result<(), MotorError> {
        let measured = self.calc_speed();

        if self.goal.magnitude() >= self.min_speed.value() {
            // Lagging raises power, leading lowers it, one step per tick.
            if measured.magnitude() < self.goal.magnitude() {
                self.trim += 1;
            } else {
                self.trim -= 1;
            }
            let limit = Power::MAX.value() as i32;
            self.trim = self.trim.clamp(-limit, limit);
        }

        self.command()
    }

    /// Map a rate magnitude into the legal power range.
    ///
    /// Linear from `[min_speed, max_speed]` onto `[min_power, Power::MAX]`,
    /// clamped at both ends.
    pub fn power_for(&self, rate: CountsPerSec) -> Power {
        let magnitude = constrain(rate.magnitude(), self.min_speed.value(), self.max_speed.value());
        let mapped = map_range(
            magnitude,
            self.min_speed.value(),
            self.max_speed.value(),
            self.min_power.value() as f32,
            Power::MAX.value() as f32,
        );
        Power::new(mapped as u16)
    }

    /// Inverse of [`power_for`](Self::power_for): the rate a power level
    /// corresponds to on the linear map.
    pub fn speed_for_power(&self, power: Power) -> CountsPerSec {
        let clamped = constrain(
            power.value() as f32,
            self.min_power.value() as f32,
            Power::MAX.value() as f32,
        );
        let mapped = map_range(
            clamped,
            self.min_power.value() as f32,
            Power::MAX.value() as f32,
            self.min_speed.value(),
            self.max_speed.value(),
        );
        CountsPerSec(mapped)
    }

    /// Stop the motor and clear the goal and trim.
    pub fn stop(&mut self) -> Result<(), MotorError> {
        self.goal = CountsPerSec::ZERO;
        self.trim = 0;
        self.motor.stop()
    }

    /// Resynchronize the sampler after an idle period.
    pub fn reset(&mut self) {
        self.prev_time = self.clock.now_micros();
        self.prev_count = self.encoder.count();
        self.prev_speed = CountsPerSec::ZERO;
    }

    /// The most recently sampled speed.
    pub fn speed(&self) -> CountsPerSec {
        self.prev_speed
    }

    /// The current rate goal.
    pub fn speed_goal(&self) -> CountsPerSec {
        self.goal
    }

    /// The current encoder count.
    pub fn count(&self) -> Counts {
        self.encoder.count()
    }

    /// The encoder handle.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// The motor handle.
    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// Release the motor, encoder, and clock.
    pub fn into_parts(self) -> (M, E, C) {
        (self.motor, self.encoder, self.clock)
    }

    /// Command the motor from the current goal and trim.
    fn command(&mut self) -> Result<(), MotorError> {
        if self.goal.magnitude() < self.min_speed.value() {
            // Negligible power would stall and buzz; stop outright.
            self.trim = 0;
            return self.motor.stop();
        }

        self.motor.set_direction(Direction::from_rate(self.goal))?;

        let base = self.power_for(self.goal).value() as i32 + self.trim;
        let command = base.clamp(self.min_power.value() as i32, Power::MAX.value() as i32);
        self.motor.set_power(Power::new(command as u16))
    }
}

fn constrain(x: f32, min: f32, max: f32) -> f32 {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

fn map_range(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span <= 0.0 {
        return out_max;
    }
    (x - in_min) * (out_max - out_min) / span + out_min
}
