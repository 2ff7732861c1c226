//! Diagonal gantry move example.
//!
//! Composes a single X axis and a synchronized Y pair into a rig and drives
//! a diagonal move while the rig balances the X:Y proportion. Hardware is
//! simulated; the Y motors are given unequal gains to show the pair
//! synchronizer at work.

use std::cell::Cell;
use std::rc::Rc;

use servo_motion::error::MotorError;
use servo_motion::{
    parse_config, AxisController, Clock, Counts, Direction, Encoder, MotionSystem, MotorDrive,
    PairController, Power, RigController, Switch,
};

const CONFIG: &str = r#"
[axes.x]
name = "X Carriage"
tolerance_counts = 10
slowdown_counts = 200
min_slow_power = 20

[pairs.y]
name = "Y Drive"
tolerance_counts = 20
diff_tolerance_counts = 5
speed_balance = 30.0

[pairs.y.motor1]
slowdown_counts = 500
min_slow_power = 27

[pairs.y.motor2]
slowdown_counts = 500
min_slow_power = 30

[rigs.gantry]
x = "x"
y = "y"
proportion_tolerance = 0.01
speed_balance = 30.0
"#;

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

#[derive(Clone, Default)]
struct SimClock(Rc<Cell<u64>>);

impl Clock for SimClock {
    fn now_micros(&mut self) -> u64 {
        self.0.get()
    }
}

#[derive(Clone, Default)]
struct SimSwitch;

impl Switch for SimSwitch {
    fn is_pressed(&mut self) -> Result<bool, MotorError> {
        Ok(false)
    }
}

struct Plant {
    motor: SimMotor,
    encoder: SimEncoder,
    gain: f32,
}

impl Plant {
    fn new(gain: f32) -> Self {
        Self {
            motor: SimMotor::default(),
            encoder: SimEncoder::default(),
            gain,
        }
    }

    fn step(&self, dt_us: u64) {
        let dt = dt_us as f32 / 1_000_000.0;
        self.encoder.advance(self.motor.signed_power() * self.gain * dt);
    }
}

fn main() {
    let system = MotionSystem::from_config(parse_config(CONFIG).expect("config should parse"));
    let clock = SimClock::default();

    let plant_x = Plant::new(2.0);
    // The two Y motors respond unevenly; the pair keeps them aligned
    let plant_y1 = Plant::new(2.0);
    let plant_y2 = Plant::new(1.7);

    let x = AxisController::builder()
        .motor(plant_x.motor.clone())
        .encoder(plant_x.encoder.clone())
        .switch(SimSwitch)
        .clock(clock.clone())
        .tuning(system.axis_tuning("x").expect("x axis"))
        .build()
        .expect("x should build");

    let y = PairController::builder()
        .motor1(plant_y1.motor.clone())
        .motor2(plant_y2.motor.clone())
        .encoder1(plant_y1.encoder.clone())
        .encoder2(plant_y2.encoder.clone())
        .switch1(SimSwitch)
        .switch2(SimSwitch)
        .clock(clock.clone())
        .tuning(system.pair_tuning("y").expect("y pair"))
        .build()
        .expect("y should build");

    let mut rig = RigController::new(x, y, system.rig_tuning("gantry").expect("gantry rig"));

    println!("Diagonal move: X to 1000, Y to 2000");
    rig.set(Counts::new(1000), Counts::new(2000));

    const TICK_US: u64 = 10_000;
    let mut ticks = 0u32;
    loop {
        clock.0.set(clock.0.get() + TICK_US);
        plant_x.step(TICK_US);
        plant_y1.step(TICK_US);
        plant_y2.step(TICK_US);

        let done = rig.perform_movement().expect("tick should succeed");
        ticks += 1;

        if ticks % 100 == 0 {
            let proportion = rig
                .movement_proportion()
                .map(|p| format!("{:.3}", p))
                .unwrap_or_else(|| "-".into());
            println!(
                "t={:>5} ms  x={:>5}  y=({:>5}, {:>5})  x:y={}",
                ticks * 10,
                rig.count_x().value(),
                rig.y().count1().value(),
                rig.y().count2().value(),
                proportion
            );
        }

        if done {
            break;
        }
    }

    println!(
        "Done after {} ms: x={}, y=({}, {}), skew={}",
        ticks * 10,
        rig.count_x().value(),
        rig.y().count1().value(),
        rig.y().count2().value(),
        (rig.y().count1() - rig.y().count2()).value()
    );
}
