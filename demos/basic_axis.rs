//! Basic single-axis move example.
//!
//! Demonstrates building an axis controller from configuration and ticking
//! it to completion. Hardware is simulated so the example runs anywhere;
//! on a target, the same builder takes embedded-hal pin and PWM types.

use std::cell::Cell;
use std::rc::Rc;

use servo_motion::error::MotorError;
use servo_motion::{
    parse_config, AxisController, Clock, Counts, Direction, Encoder, MotorDrive, Power, Switch,
};

const CONFIG: &str = r#"
[axes.x]
name = "X Carriage"
tolerance_counts = 10
slowdown_counts = 200
min_slow_power = 20
min_speed = 50.0
max_speed = 400.0
"#;

/// Simulated motor: commanded power is observable for the plant model.
#[derive(Clone, Default)]
struct SimMotor(Rc<Cell<(i32, u16)>>);

impl SimMotor {
    fn signed_power(&self) -> f32 {
        let (dir, power) = self.0.get();
        dir as f32 * power as f32
    }
}

impl MotorDrive for SimMotor {
    fn set_direction(&mut self, direction: Direction) -> Result<(), MotorError> {
        let (_, power) = self.0.get();
        self.0.set((direction.sign(), power));
        Ok(())
    }

    fn set_power(&mut self, power: Power) -> Result<(), MotorError> {
        let (dir, _) = self.0.get();
        self.0.set((dir, power.value()));
        Ok(())
    }

    fn direction(&self) -> Direction {
        Direction::from_sign(self.0.get().0)
    }

    fn power(&self) -> Power {
        Power::new(self.0.get().1)
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.0.set((0, 0));
        Ok(())
    }
}

/// Simulated encoder with a fractional accumulator.
#[derive(Clone, Default)]
struct SimEncoder {
    count: Rc<Cell<i32>>,
    fraction: Rc<Cell<f32>>,
}

impl SimEncoder {
    fn advance(&self, delta: f32) {
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

/// Manually stepped clock.
#[derive(Clone, Default)]
struct SimClock(Rc<Cell<u64>>);

impl Clock for SimClock {
    fn now_micros(&mut self) -> u64 {
        self.0.get()
    }
}

/// Switch that never presses (no homing in this example).
#[derive(Clone, Default)]
struct SimSwitch;

impl Switch for SimSwitch {
    fn is_pressed(&mut self) -> Result<bool, MotorError> {
        Ok(false)
    }
}

fn main() {
    let config = parse_config(CONFIG).expect("config should parse");

    let motor = SimMotor::default();
    let encoder = SimEncoder::default();
    let clock = SimClock::default();

    let mut axis = AxisController::builder()
        .motor(motor.clone())
        .encoder(encoder.clone())
        .switch(SimSwitch)
        .clock(clock.clone())
        .from_config(&config, "x")
        .expect("axis should exist")
        .build()
        .expect("axis should build");

    println!("Moving to 1000 counts...");
    axis.set(Counts::new(1000));

    // 10 ms control tick; plant: 2 counts/sec per unit of power
    const TICK_US: u64 = 10_000;
    let mut ticks = 0u32;
    loop {
        clock.0.set(clock.0.get() + TICK_US);
        encoder.advance(motor.signed_power() * 2.0 * (TICK_US as f32 / 1_000_000.0));

        let done = axis.perform_movement().expect("tick should succeed");
        ticks += 1;

        if ticks % 50 == 0 {
            println!(
                "t={:>5} ms  count={:>5}  target={:>6.1} counts/s  power={:>3}",
                ticks * 10,
                axis.count().value(),
                axis.target_speed().value(),
                motor.power().value()
            );
        }

        if done {
            break;
        }
    }

    println!(
        "Arrived at {} counts after {} ticks ({} ms)",
        axis.count().value(),
        ticks,
        ticks * 10
    );
}
