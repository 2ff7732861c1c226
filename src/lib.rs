//! # servo-motion
//!
//! Closed-loop DC motor axis control with encoder feedback and embedded-hal
//! 1.0 support.
//!
//! ## Features
//!
//! - **Configuration-driven**: Define axis tunings in TOML files
//! - **embedded-hal 1.0**: Uses `OutputPin`/`InputPin` for direction and
//!   limit switches, `SetDutyCycle` for motor power
//! - **no_std compatible**: Core library works without standard library
//! - **Slowdown profiles**: Full speed far out, linear deceleration near the
//!   goal, stop inside the tolerance band
//! - **Pair synchronization**: Bounded speed corrections keep two motors in
//!   lockstep
//! - **Interrupt-safe encoders**: Atomic count cell shared between the edge
//!   ISR and the control loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use servo_motion::{AxisController, QuadratureCounter, SystemConfig};
//!
//! static ENCODER: QuadratureCounter = QuadratureCounter::new();
//!
//! // Load configuration from TOML
//! let config: SystemConfig = servo_motion::load_config("motion.toml")?;
//!
//! // Build a controller around the hardware handles
//! let mut axis = AxisController::builder()
//!     .motor(motor)
//!     .encoder(&ENCODER)
//!     .switch(home_switch)
//!     .clock(clock)
//!     .from_config(&config, "x")?
//!     .build()?;
//!
//! // Command a move and tick it from the control loop
//! axis.set(servo_motion::Counts::new(1000));
//! loop {
//!     if axis.perform_movement()? {
//!         break;
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt formatting for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod control;
pub mod error;
pub mod hal;

// Re-exports for ergonomic API
pub use config::{AxisTuning, PairMotorTuning, PairTuning, RigConfig, RigTuning, SystemConfig,
    validate_config};
pub use control::{
    AxisController, AxisControllerBuilder, MotionSystem, PairController, PairControllerBuilder,
    RigController, SpeedRegulator,
};
pub use error::{Error, Result};
pub use hal::{
    Clock, Direction, DualPinMotor, Encoder, LimitSwitch, MotorDrive, QuadratureCounter,
    SinglePinMotor, Switch, SwitchPolarity,
};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

#[cfg(feature = "std")]
pub use hal::StdClock;

// Unit types
pub use config::units::{Counts, CountsPerSec, Power};
