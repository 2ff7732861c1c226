//! Property tests for the control laws.

use proptest::prelude::*;

use crate::common::{AxisPlant, SimClock, SimEncoder, SimMotor, SimSwitch};
use servo_motion::{
    AxisController, Counts, CountsPerSec, Encoder, PairController, PairMotorTuning, Power,
    SpeedRegulator,
};

const GOAL: i32 = 100_000;

/// The slowdown-profile target magnitude at a given distance from the goal.
fn profile_target(distance: i32) -> f32 {
    let clock = SimClock::default();
    let plant = AxisPlant::new(2.0);

    let mut axis = AxisController::builder()
        .motor(plant.motor.clone())
        .encoder(plant.encoder.clone())
        .switch(plant.switch.clone())
        .clock(clock)
        .tolerance(Counts::new(10))
        .slowdown_threshold(Counts::new(200))
        .min_slow_power(Power::new(20))
        .speed_bounds(CountsPerSec(50.0), CountsPerSec(400.0))
        .build()
        .unwrap();

    axis.set(Counts::new(GOAL));
    plant.encoder.set_count(Counts::new(GOAL - distance));
    axis.target_speed().value()
}

fn make_regulator() -> SpeedRegulator<SimMotor, SimEncoder, SimClock> {
    let mut regulator = SpeedRegulator::new(
        SimMotor::default(),
        SimEncoder::default(),
        SimClock::default(),
        CountsPerSec(50.0),
        CountsPerSec(400.0),
    );
    regulator.set_min_power(Power::new(20));
    regulator
}

/// A pair with identical tunings on both motors, for balance observations.
struct PairFixture {
    controller: PairController<SimMotor, SimEncoder, SimSwitch, SimClock>,
    encoder1: SimEncoder,
    encoder2: SimEncoder,
    clock: SimClock,
}

fn make_pair() -> PairFixture {
    let clock = SimClock::default();
    let plant1 = AxisPlant::new(2.0);
    let plant2 = AxisPlant::new(2.0);

    let tuning = PairMotorTuning {
        slowdown_threshold: Counts::new(500),
        min_slow_power: Power::new(27),
    };

    let controller = PairController::builder()
        .motor1(plant1.motor.clone())
        .motor2(plant2.motor.clone())
        .encoder1(plant1.encoder.clone())
        .encoder2(plant2.encoder.clone())
        .switch1(plant1.switch.clone())
        .switch2(plant2.switch.clone())
        .clock(clock.clone())
        .tolerance(Counts::new(20))
        .diff_tolerance(Counts::new(5))
        .speed_balance(CountsPerSec(30.0))
        .speed_bounds(CountsPerSec(50.0), CountsPerSec(400.0))
        .motor1_tuning(tuning)
        .motor2_tuning(tuning)
        .build()
        .unwrap();

    PairFixture {
        controller,
        encoder1: plant1.encoder,
        encoder2: plant2.encoder,
        clock,
    }
}

proptest! {
    /// Far outside the slowdown band the target is exactly the max bound.
    #[test]
    fn prop_profile_is_max_beyond_threshold(distance in 200i32..10_000) {
        prop_assert_eq!(profile_target(distance), 400.0);
    }

    /// Inside the tolerance band the target is exactly zero.
    #[test]
    fn prop_profile_is_zero_within_tolerance(distance in 0i32..=10) {
        prop_assert_eq!(profile_target(distance), 0.0);
    }

    /// The target magnitude never decreases as the distance grows.
    #[test]
    fn prop_profile_magnitude_monotone(d1 in 0i32..5_000, d2 in 0i32..5_000) {
        let (lo, hi) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
        prop_assert!(profile_target(lo) <= profile_target(hi) + 1e-3);
    }

    /// The power map always lands inside the legal power range.
    #[test]
    fn prop_power_map_stays_in_range(rate in -2_000.0f32..2_000.0) {
        let regulator = make_regulator();
        let power = regulator.power_for(CountsPerSec(rate)).value();
        prop_assert!((20..=255).contains(&power));
    }

    /// The inverse map undoes the forward map, up to integer rounding.
    #[test]
    fn prop_power_map_round_trips(power in 20u16..=255) {
        let regulator = make_regulator();
        let rate = regulator.speed_for_power(Power::new(power));
        let back = regulator.power_for(rate).value();
        prop_assert!(back.abs_diff(power) <= 1);
    }

    /// Divergence inside the tolerance band applies zero correction: both
    /// motors receive identical rate goals.
    #[test]
    fn prop_balance_idle_within_tolerance(base in 0i32..1_000, delta in -5i32..=5) {
        let mut f = make_pair();
        f.controller.set_both(Counts::new(GOAL));
        f.encoder1.set_count(Counts::new(base + delta));
        f.encoder2.set_count(Counts::new(base));

        f.clock.advance(10_000);
        f.controller.perform_movement().unwrap();

        prop_assert_eq!(
            f.controller.regulator1().speed_goal().value(),
            f.controller.regulator2().speed_goal().value()
        );
    }

    /// Divergence beyond the tolerance band trims the leader below the
    /// laggard's commanded rate.
    #[test]
    fn prop_balance_corrects_outside_tolerance(base in 0i32..1_000, delta in 6i32..200) {
        let mut f = make_pair();
        f.controller.set_both(Counts::new(GOAL));
        f.encoder1.set_count(Counts::new(base + delta));
        f.encoder2.set_count(Counts::new(base));

        f.clock.advance(10_000);
        f.controller.perform_movement().unwrap();

        prop_assert!(
            f.controller.regulator1().speed_goal().value()
                < f.controller.regulator2().speed_goal().value()
        );
    }
}
