//! Hardware abstraction for servo-motion.
//!
//! Capability interfaces for motors, encoders, switches, and the clock,
//! plus concrete drivers over embedded-hal 1.0 types.

mod clock;
mod encoder;
mod motor;
mod switch;

pub use clock::Clock;
#[cfg(feature = "std")]
pub use clock::StdClock;
pub use encoder::{Encoder, QuadratureCounter};
pub use motor::{Direction, DualPinMotor, MotorDrive, SinglePinMotor};
pub use switch::{LimitSwitch, Switch, SwitchPolarity};
