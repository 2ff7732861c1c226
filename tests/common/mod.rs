//! Shared simulation fixtures for integration tests.
//!
//! A first-order plant: motor power maps linearly to encoder rate through a
//! per-motor gain, and the harness advances the physics tick by tick.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use servo_motion::error::MotorError;
use servo_motion::{Clock, Counts, Direction, Encoder, MotorDrive, Power, Switch};

/// Observable command state of a [`SimMotor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimMotorState {
    pub direction: Direction,
    pub power: u16,
}

/// Motor that records commands into shared state; clones observe it.
#[derive(Clone, Default)]
pub struct SimMotor(Rc<Cell<SimMotorState>>);

impl SimMotor {
    pub fn state(&self) -> SimMotorState {
        self.0.get()
    }

    /// Signed commanded power: direction sign times magnitude.
    pub fn signed_power(&self) -> f32 {
        let state = self.0.get();
        state.direction.sign() as f32 * state.power as f32
    }
}

impl MotorDrive for SimMotor {
    fn set_direction(&mut self, direction: Direction) -> Result<(), MotorError> {
        let mut state = self.0.get();
        state.direction = direction;
        self.0.set(state);
        Ok(())
    }

    fn set_power(&mut self, power: Power) -> Result<(), MotorError> {
        let mut state = self.0.get();
        state.power = power.value();
        self.0.set(state);
        Ok(())
    }

    fn direction(&self) -> Direction {
        self.0.get().direction
    }

    fn power(&self) -> Power {
        Power::new(self.0.get().power)
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.0.set(SimMotorState::default());
        Ok(())
    }
}

/// Encoder over a shared count cell with a fractional accumulator so slow
/// rates still integrate.
#[derive(Clone, Default)]
pub struct SimEncoder {
    count: Rc<Cell<i32>>,
    fraction: Rc<Cell<f32>>,
}

impl SimEncoder {
    /// Integrate a signed count delta into the cell.
    pub fn advance(&self, delta: f32) {
        let total = self.fraction.get() + delta;
        let whole = total as i32;
        self.fraction.set(total - whole as f32);
        self.count.set(self.count.get() + whole);
    }
}

impl Encoder for SimEncoder {
    fn count(&self) -> Counts {
        Counts::new(self.count.get())
    }

    fn set_count(&self, value: Counts) {
        self.count.set(value.value());
        self.fraction.set(0.0);
    }

    fn increment(&self) {
        self.count.set(self.count.get() + 1);
    }

    fn decrement(&self) {
        self.count.set(self.count.get() - 1);
    }
}

/// Manually advanced clock; clones share the time base.
#[derive(Clone, Default)]
pub struct SimClock(Rc<Cell<u64>>);

impl SimClock {
    pub fn advance(&self, micros: u64) {
        self.0.set(self.0.get() + micros);
    }
}

impl Clock for SimClock {
    fn now_micros(&mut self) -> u64 {
        self.0.get()
    }
}

/// Switch with an externally or plant-driven pressed state.
#[derive(Clone, Default)]
pub struct SimSwitch(Rc<Cell<bool>>);

impl SimSwitch {
    pub fn set_pressed(&self, pressed: bool) {
        self.0.set(pressed);
    }
}

impl Switch for SimSwitch {
    fn is_pressed(&mut self) -> Result<bool, MotorError> {
        Ok(self.0.get())
    }
}

/// One motor/encoder/switch triple with first-order dynamics.
pub struct AxisPlant {
    pub motor: SimMotor,
    pub encoder: SimEncoder,
    pub switch: SimSwitch,
    /// Encoder counts/sec produced per unit of commanded power.
    pub gain: f32,
    /// Switch presses when the count is at or below this position.
    pub home_below: Option<i32>,
}

impl AxisPlant {
    pub fn new(gain: f32) -> Self {
        Self {
            motor: SimMotor::default(),
            encoder: SimEncoder::default(),
            switch: SimSwitch::default(),
            gain,
            home_below: None,
        }
    }

    pub fn with_home_below(mut self, position: i32) -> Self {
        self.home_below = Some(position);
        self
    }

    /// Advance the physics by `dt_us` under the current motor command.
    pub fn step(&self, dt_us: u64) {
        let dt_secs = dt_us as f32 / 1_000_000.0;
        let rate = self.motor.signed_power() * self.gain;
        self.encoder.advance(rate * dt_secs);

        if let Some(home) = self.home_below {
            self.switch
                .set_pressed(self.encoder.count().value() <= home);
        }
    }
}

/// Control tick period used throughout the integration tests: 10 ms.
pub const TICK_US: u64 = 10_000;
