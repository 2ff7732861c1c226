//! Error types for servo-motion library.
//!
//! Provides unified error handling across configuration and motor control.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all servo-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor operation error
    Motor(MotorError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Axis name not found in configuration
    AxisNotFound(heapless::String<32>),
    /// Motor pair name not found in configuration
    PairNotFound(heapless::String<32>),
    /// Rig name not found in configuration
    RigNotFound(heapless::String<32>),
    /// Tolerance band must be strictly inside the slowdown threshold
    InvalidToleranceBand {
        /// Acceptance band in encoder counts
        tolerance: i32,
        /// Slowdown threshold in encoder counts
        slowdown: i32,
    },
    /// Speed bounds must satisfy 0 < min < max
    InvalidSpeedBounds {
        /// Minimum regulated speed in counts/sec
        min: f32,
        /// Maximum regulated speed in counts/sec
        max: f32,
    },
    /// Homing speed must be > 0
    InvalidResetSpeed(f32),
    /// Cross-motor divergence tolerance must be > 0
    InvalidDiffTolerance(i32),
    /// Synchronization correction bound must be > 0
    InvalidSpeedBalance(f32),
    /// Proportion tolerance must be in (0, 1)
    InvalidProportionTolerance(f32),
    /// A required hardware handle was not supplied to a builder
    MissingHardware(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorError {
    /// Pin or PWM operation failed
    PinError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::AxisNotFound(name) => write!(f, "Axis '{}' not found", name),
            ConfigError::PairNotFound(name) => write!(f, "Motor pair '{}' not found", name),
            ConfigError::RigNotFound(name) => write!(f, "Rig '{}' not found", name),
            ConfigError::InvalidToleranceBand { tolerance, slowdown } => {
                write!(
                    f,
                    "Invalid tolerance band: {} must be < slowdown threshold {}",
                    tolerance, slowdown
                )
            }
            ConfigError::InvalidSpeedBounds { min, max } => {
                write!(f, "Invalid speed bounds: must satisfy 0 < {} < {}", min, max)
            }
            ConfigError::InvalidResetSpeed(v) => {
                write!(f, "Invalid reset speed: {}. Must be > 0", v)
            }
            ConfigError::InvalidDiffTolerance(v) => {
                write!(f, "Invalid divergence tolerance: {}. Must be > 0", v)
            }
            ConfigError::InvalidSpeedBalance(v) => {
                write!(f, "Invalid speed balance: {}. Must be > 0", v)
            }
            ConfigError::InvalidProportionTolerance(v) => {
                write!(f, "Invalid proportion tolerance: {}. Must be in (0, 1)", v)
            }
            ConfigError::MissingHardware(what) => write!(f, "Missing hardware: {}", what),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin or PWM operation failed"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}
