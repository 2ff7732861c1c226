//! Closed-loop controllers for servo-motion.
//!
//! Layered bottom-up: the [`SpeedRegulator`] turns a rate goal into power,
//! the [`AxisController`] drives one motor to a position goal, the
//! [`PairController`] keeps two motors synchronized on the way to theirs,
//! and the [`RigController`] coordinates an axis and a pair along a
//! proportional path.

mod axis;
mod pair;
mod regulator;
mod rig;
mod system;

pub use axis::{AxisController, AxisControllerBuilder};
pub use pair::{PairController, PairControllerBuilder};
pub use regulator::SpeedRegulator;
pub use rig::RigController;
pub use system::MotionSystem;
