//! Configuration module for servo-motion.
//!
//! Provides types for loading and validating axis, pair, and rig tunings
//! from TOML files (with `std` feature) or pre-parsed data.

mod axis;
#[cfg(feature = "std")]
mod loader;
mod pair;
mod rig;
mod system;
pub mod units;
pub(crate) mod validation;

pub use axis::AxisTuning;
pub use pair::{PairMotorTuning, PairTuning};
pub use rig::{RigConfig, RigTuning};
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Counts, CountsPerSec, Power};
