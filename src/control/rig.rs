//! Rig controller: one single axis (X) plus one motor pair (Y), coordinated
//! so diagonal moves track the goal proportion.

use libm::fabsf;

use crate::config::units::{Counts, CountsPerSec};
use crate::config::RigTuning;
use crate::error::Result;
use crate::hal::{Clock, Encoder, MotorDrive, Switch};

use super::axis::AxisController;
use super::pair::PairController;

/// Coordinates an [`AxisController`] and a [`PairController`] along a
/// straight diagonal.
///
/// Each axis runs its own slowdown profile; the rig only nudges their pace
/// so both are predicted to reach their goals simultaneously.
pub struct RigController<MX, EX, SX, MY, EY, SY, C> {
    x: AxisController<MX, EX, SX, C>,
    y: PairController<MY, EY, SY, C>,
    proportion_tolerance: f32,
    speed_balance: CountsPerSec,
    /// X:Y goal-delta ratio of the current move; `None` disables balancing.
    desired_proportion: Option<f32>,
    start_x: Counts,
    start_y: Counts,
    x_homed: bool,
    y_homed: bool,
}

impl<MX, EX, SX, MY, EY, SY, C> RigController<MX, EX, SX, MY, EY, SY, C>
where
    MX: MotorDrive,
    EX: Encoder,
    SX: Switch,
    MY: MotorDrive,
    EY: Encoder,
    SY: Switch,
    C: Clock,
{
    /// Compose a rig from its two sub-controllers.
    pub fn new(
        x: AxisController<MX, EX, SX, C>,
        y: PairController<MY, EY, SY, C>,
        tuning: RigTuning,
    ) -> Self {
        let start_x = x.count();
        let start_y = y.count();
        Self {
            x,
            y,
            proportion_tolerance: tuning.proportion_tolerance,
            speed_balance: tuning.speed_balance,
            desired_proportion: None,
            start_x,
            start_y,
            x_homed: false,
            y_homed: false,
        }
    }

    /// Store new goals for both axes and record the move's proportion.
    ///
    /// Balancing is disabled when the Y goal delta is zero. Returns `true`
    /// if both axes are already within tolerance.
    pub fn set(&mut self, goal_x: Counts, goal_y: Counts) -> bool {
        let x_done = self.x.set(goal_x);
        let y_done = self.y.set_both(goal_y);

        self.start_x = self.x.count();
        self.start_y = self.y.count();

        let dx = (goal_x - self.start_x).value();
        let dy = (goal_y - self.start_y).value();
        self.desired_proportion = if dy == 0 {
            None
        } else {
            Some(dx as f32 / dy as f32)
        };

        x_done && y_done
    }

    /// The achieved X:Y progress ratio since the move began.
    ///
    /// `None` until Y has progressed.
    pub fn movement_proportion(&self) -> Option<f32> {
        let progress_y = (self.y.count() - self.start_y).value();
        if progress_y == 0 {
            return None;
        }
        let progress_x = (self.x.count() - self.start_x).value();
        Some(progress_x as f32 / progress_y as f32)
    }

    /// Compare the achieved proportion against the goal and nudge both
    /// axes' pace so they arrive together.
    ///
    /// Within `proportion_tolerance` the nudge is zero. The accumulated
    /// pace corrections are bounded by `speed_balance` on each axis.
    pub fn balance_speed(&mut self) {
        let desired = match self.desired_proportion {
            Some(d) if d != 0.0 => d,
            _ => return,
        };
        let achieved = match self.movement_proportion() {
            Some(a) => a,
            None => return,
        };

        let error = achieved / desired - 1.0;
        if fabsf(error) <= self.proportion_tolerance {
            return;
        }

        let bound = self.speed_balance.magnitude();
        let step = (fabsf(error) * bound).min(bound);

        if error > 0.0 {
            // X has covered proportionally more ground: hurry Y, rein in X.
            self.move_speed_toward_y(CountsPerSec(step));
            self.move_speed_toward_x(CountsPerSec(-step));
        } else {
            self.move_speed_toward_y(CountsPerSec(-step));
            self.move_speed_toward_x(CountsPerSec(step));
        }
    }

    /// Adjust the X axis pace, bounded by the rig's `speed_balance`.
    pub fn move_speed_toward_x(&mut self, delta: CountsPerSec) {
        self.x.move_speed_toward(delta, self.speed_balance);
    }

    /// Adjust the Y pair pace, bounded by the rig's `speed_balance`.
    pub fn move_speed_toward_y(&mut self, delta: CountsPerSec) {
        self.y.move_speed_toward(delta, self.speed_balance);
    }

    /// One control tick: rebalance, then run both axes.
    pub fn perform_movement(&mut self) -> Result<bool> {
        self.balance_speed();
        let x_done = self.x.perform_movement()?;
        let y_done = self.y.perform_movement()?;
        Ok(x_done && y_done)
    }

    /// One homing tick for both axes.
    ///
    /// Each side's completion is latched, so the slower axis can finish
    /// later; overall reset reports done once, when both have homed.
    pub fn perform_reset(&mut self) -> Result<bool> {
        if !self.x_homed && self.x.perform_reset()? {
            self.x_homed = true;
        }
        if !self.y_homed && self.y.perform_reset()? {
            self.y_homed = true;
        }

        if self.x_homed && self.y_homed {
            self.x_homed = false;
            self.y_homed = false;
            self.start_x = Counts::new(0);
            self.start_y = Counts::new(0);
            self.desired_proportion = None;
            return Ok(true);
        }
        Ok(false)
    }

    /// Whether both axes have reached their goals.
    pub fn is_done(&self) -> bool {
        self.x.is_done() && self.y.is_done()
    }

    /// Whether the X axis has reached its goal.
    pub fn is_done_x(&self) -> bool {
        self.x.is_done()
    }

    /// Whether the Y pair has reached its goals.
    pub fn is_done_y(&self) -> bool {
        self.y.is_done()
    }

    /// Stop both axes.
    pub fn stop(&mut self) -> Result<()> {
        self.x.stop()?;
        self.y.stop()?;
        Ok(())
    }

    /// The X axis encoder count.
    pub fn count_x(&self) -> Counts {
        self.x.count()
    }

    /// The Y pair's average encoder count.
    pub fn count_y(&self) -> Counts {
        self.y.count()
    }

    /// The X axis goal.
    pub fn goal_x(&self) -> Counts {
        self.x.goal()
    }

    /// The Y pair's average goal.
    pub fn goal_y(&self) -> Counts {
        self.y.goal()
    }

    /// The X sub-controller.
    pub fn x(&self) -> &AxisController<MX, EX, SX, C> {
        &self.x
    }

    /// The Y sub-controller.
    pub fn y(&self) -> &PairController<MY, EY, SY, C> {
        &self.y
    }

    /// The X sub-controller, mutably.
    pub fn x_mut(&mut self) -> &mut AxisController<MX, EX, SX, C> {
        &mut self.x
    }

    /// The Y sub-controller, mutably.
    pub fn y_mut(&mut self) -> &mut PairController<MY, EY, SY, C> {
        &mut self.y
    }

    /// Release the two sub-controllers.
    pub fn into_parts(
        self,
    ) -> (
        AxisController<MX, EX, SX, C>,
        PairController<MY, EY, SY, C>,
    ) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{TestClock, TestEncoder, TestMotor, TestSwitch};
    use super::*;
    use crate::config::units::Power;
    use crate::config::PairMotorTuning;

    struct Fixture {
        rig: RigController<
            TestMotor,
            TestEncoder,
            TestSwitch,
            TestMotor,
            TestEncoder,
            TestSwitch,
            TestClock,
        >,
        enc_x: TestEncoder,
        enc_y1: TestEncoder,
        enc_y2: TestEncoder,
        clock: TestClock,
        switch_x: TestSwitch,
        switch_y1: TestSwitch,
        switch_y2: TestSwitch,
    }

    fn make_rig() -> Fixture {
        let clock = TestClock::default();
        let enc_x = TestEncoder::default();
        let enc_y1 = TestEncoder::default();
        let enc_y2 = TestEncoder::default();
        let switch_x = TestSwitch::default();
        let switch_y1 = TestSwitch::default();
        let switch_y2 = TestSwitch::default();

        let x = AxisController::builder()
            .motor(TestMotor::default())
            .encoder(enc_x.clone())
            .switch(switch_x.clone())
            .clock(clock.clone())
            .tolerance(Counts::new(10))
            .slowdown_threshold(Counts::new(200))
            .min_slow_power(Power::new(20))
            .speed_bounds(CountsPerSec(50.0), CountsPerSec(400.0))
            .build()
            .unwrap();

        let y_tuning = PairMotorTuning {
            slowdown_threshold: Counts::new(500),
            min_slow_power: Power::new(27),
        };
        let y = PairController::builder()
            .motor1(TestMotor::default())
            .motor2(TestMotor::default())
            .encoder1(enc_y1.clone())
            .encoder2(enc_y2.clone())
            .switch1(switch_y1.clone())
            .switch2(switch_y2.clone())
            .clock(clock.clone())
            .tolerance(Counts::new(20))
            .diff_tolerance(Counts::new(5))
            .speed_bounds(CountsPerSec(50.0), CountsPerSec(400.0))
            .motor1_tuning(y_tuning)
            .motor2_tuning(y_tuning)
            .build()
            .unwrap();

        let rig = RigController::new(
            x,
            y,
            RigTuning {
                proportion_tolerance: 0.01,
                speed_balance: CountsPerSec(30.0),
            },
        );

        Fixture {
            rig,
            enc_x,
            enc_y1,
            enc_y2,
            clock,
            switch_x,
            switch_y1,
            switch_y2,
        }
    }

    fn set_y_counts(f: &Fixture, value: i32) {
        f.enc_y1.set_count(Counts::new(value));
        f.enc_y2.set_count(Counts::new(value));
    }

    #[test]
    fn test_proportion_none_until_y_moves() {
        let mut f = make_rig();
        f.rig.set(Counts::new(500), Counts::new(1000));

        assert!(f.rig.movement_proportion().is_none());

        f.enc_x.set_count(Counts::new(50));
        assert!(f.rig.movement_proportion().is_none());

        set_y_counts(&f, 100);
        let achieved = f.rig.movement_proportion().unwrap();
        assert!((achieved - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_zero_y_goal_disables_balancing() {
        let mut f = make_rig();
        f.rig.set(Counts::new(2000), Counts::new(0));

        f.enc_x.set_count(Counts::new(600));
        f.clock.advance(10_000);
        f.rig.perform_movement().unwrap();

        // No balancing: X runs its profile at full speed
        assert_eq!(f.rig.x().regulator().speed_goal().value(), 400.0);
    }

    #[test]
    fn test_balance_reins_in_the_leading_axis() {
        let mut f = make_rig();
        f.rig.set(Counts::new(2000), Counts::new(2000));

        // X twice as far along as Y
        f.enc_x.set_count(Counts::new(600));
        set_y_counts(&f, 300);

        f.clock.advance(10_000);
        f.rig.perform_movement().unwrap();

        // Error is clamped to the full balance bound of 30: X runs at
        // 400 - 30, Y stays clamped at its max
        let x_goal = f.rig.x().regulator().speed_goal().value();
        assert!((x_goal - 370.0).abs() < 0.01);
        assert_eq!(f.rig.y().regulator1().speed_goal().value(), 400.0);
    }

    #[test]
    fn test_balance_idle_within_tolerance() {
        let mut f = make_rig();
        f.rig.set(Counts::new(2000), Counts::new(2000));

        f.enc_x.set_count(Counts::new(500));
        set_y_counts(&f, 500);

        f.clock.advance(10_000);
        f.rig.perform_movement().unwrap();

        assert_eq!(f.rig.x().regulator().speed_goal().value(), 400.0);
        assert_eq!(f.rig.y().regulator1().speed_goal().value(), 400.0);
    }

    #[test]
    fn test_reset_latches_until_both_axes_home() {
        let mut f = make_rig();
        f.enc_x.set_count(Counts::new(120));
        set_y_counts(&f, 200);

        f.clock.advance(10_000);
        assert!(!f.rig.perform_reset().unwrap());

        // X homes first and stays latched
        f.switch_x.set_pressed(true);
        f.clock.advance(10_000);
        assert!(!f.rig.perform_reset().unwrap());
        assert_eq!(f.rig.count_x().value(), 0);

        // Y homes: overall reset completes
        f.switch_y1.set_pressed(true);
        f.switch_y2.set_pressed(true);
        f.clock.advance(10_000);
        assert!(f.rig.perform_reset().unwrap());
        assert_eq!(f.rig.count_y().value(), 0);
    }

    #[test]
    fn test_done_is_conjunction() {
        let mut f = make_rig();
        f.enc_x.set_count(Counts::new(500));
        set_y_counts(&f, 500);
        f.rig.set(Counts::new(500), Counts::new(1000));

        assert!(f.rig.is_done_x());
        assert!(!f.rig.is_done_y());
        assert!(!f.rig.is_done());
    }
}
