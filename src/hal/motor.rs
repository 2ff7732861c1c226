//! Motor drive abstraction.
//!
//! Generic over embedded-hal 1.0 pin and PWM types. Two driver variants are
//! provided: one for H-bridges with two direction pins, one for drivers with
//! a single direction pin. Both carry a wiring-polarity multiplier fixed at
//! construction.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::config::units::{CountsPerSec, Power};
use crate::error::MotorError;

/// Direction of motor rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive encoder direction.
    Forward,
    /// Negative encoder direction.
    Reverse,
    /// No drive.
    #[default]
    Stopped,
}

impl Direction {
    /// Get direction from a signed value.
    #[inline]
    pub fn from_sign(value: i32) -> Self {
        match value {
            v if v > 0 => Direction::Forward,
            v if v < 0 => Direction::Reverse,
            _ => Direction::Stopped,
        }
    }

    /// Get direction from the sign of an encoder rate.
    #[inline]
    pub fn from_rate(rate: CountsPerSec) -> Self {
        if rate.value() > 0.0 {
            Direction::Forward
        } else if rate.value() < 0.0 {
            Direction::Reverse
        } else {
            Direction::Stopped
        }
    }

    /// Get the sign multiplier (1, -1, 0).
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
            Direction::Stopped => 0,
        }
    }

    /// The opposite direction. `Stopped` flips to itself.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
            Direction::Stopped => Direction::Stopped,
        }
    }
}

/// Capability interface for a drivable motor.
///
/// Implementations cache the commanded direction and power so that
/// [`direction`](MotorDrive::direction) and [`power`](MotorDrive::power) are
/// pure reads. Power values beyond [`Power::MAX`] are clamped, not rejected.
pub trait MotorDrive {
    /// Set direction (sign) and magnitude (absolute value) in one call.
    fn set_signed(&mut self, power: i16) -> Result<(), MotorError> {
        self.set_direction(Direction::from_sign(power as i32))?;
        self.set_power(Power::new(power.unsigned_abs()))
    }

    /// Set the drive direction without altering power.
    fn set_direction(&mut self, direction: Direction) -> Result<(), MotorError>;

    /// Set the power magnitude without altering direction.
    fn set_power(&mut self, power: Power) -> Result<(), MotorError>;

    /// Raise the power magnitude. Never flips direction.
    fn increment_power(&mut self, delta: u16) -> Result<(), MotorError> {
        let raised = self.power().value().saturating_add(delta);
        self.set_power(Power::new(raised))
    }

    /// Lower the power magnitude. Never flips direction.
    fn decrement_power(&mut self, delta: u16) -> Result<(), MotorError> {
        let lowered = self.power().value().saturating_sub(delta);
        self.set_power(Power::new(lowered))
    }

    /// The currently commanded direction.
    fn direction(&self) -> Direction;

    /// The currently commanded power magnitude.
    fn power(&self) -> Power;

    /// Unconditionally command zero power, effective before the next tick.
    fn stop(&mut self) -> Result<(), MotorError>;
}

/// Motor driver for H-bridges with two direction pins and one PWM input.
pub struct DualPinMotor<D1, D2, PWM> {
    dir1: D1,
    dir2: D2,
    pwm: PWM,
    /// Commanded direction; `None` until the first command reaches the pins.
    direction: Option<Direction>,
    power: Power,
    /// Wiring polarity multiplier (-1 flips directions, 1 keeps them).
    polarity: i32,
}

impl<D1, D2, PWM> DualPinMotor<D1, D2, PWM>
where
    D1: OutputPin,
    D2: OutputPin,
    PWM: SetDutyCycle,
{
    /// Create a new driver with normal wiring polarity.
    pub fn new(dir1: D1, dir2: D2, pwm: PWM) -> Self {
        Self {
            dir1,
            dir2,
            pwm,
            direction: None,
            power: Power::ZERO,
            polarity: 1,
        }
    }

    /// Flip the wiring polarity so `Forward` drives the pins reversed.
    pub fn reversed(mut self) -> Self {
        self.polarity = -1;
        self
    }

    /// Set the polarity multiplier (-1 flips directions, anything else keeps them).
    pub fn set_polarity(&mut self, multiplier: i32) {
        self.polarity = if multiplier < 0 { -1 } else { 1 };
        // Force the next direction command to rewrite the pins
        self.direction = None;
    }

    /// Release the underlying pins and PWM channel.
    pub fn into_parts(self) -> (D1, D2, PWM) {
        (self.dir1, self.dir2, self.pwm)
    }

    fn write_direction(&mut self, direction: Direction) -> Result<(), MotorError> {
        let effective = if self.polarity < 0 {
            direction.flipped()
        } else {
            direction
        };

        match effective {
            Direction::Forward => {
                self.dir1.set_high().map_err(|_| MotorError::PinError)?;
                self.dir2.set_low().map_err(|_| MotorError::PinError)?;
            }
            Direction::Reverse => {
                self.dir1.set_low().map_err(|_| MotorError::PinError)?;
                self.dir2.set_high().map_err(|_| MotorError::PinError)?;
            }
            Direction::Stopped => {
                self.dir1.set_low().map_err(|_| MotorError::PinError)?;
                self.dir2.set_low().map_err(|_| MotorError::PinError)?;
            }
        }

        Ok(())
    }
}

impl<D1, D2, PWM> MotorDrive for DualPinMotor<D1, D2, PWM>
where
    D1: OutputPin,
    D2: OutputPin,
    PWM: SetDutyCycle,
{
    fn set_direction(&mut self, direction: Direction) -> Result<(), MotorError> {
        if self.direction == Some(direction) {
            return Ok(());
        }
        self.write_direction(direction)?;
        self.direction = Some(direction);
        Ok(())
    }

    fn set_power(&mut self, power: Power) -> Result<(), MotorError> {
        self.pwm
            .set_duty_cycle_fraction(power.value(), Power::MAX.value())
            .map_err(|_| MotorError::PinError)?;
        self.power = power;
        Ok(())
    }

    fn direction(&self) -> Direction {
        self.direction.unwrap_or(Direction::Stopped)
    }

    fn power(&self) -> Power {
        self.power
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.set_power(Power::ZERO)?;
        self.set_direction(Direction::Stopped)
    }
}

/// Motor driver for controllers with a single direction pin and one PWM input.
pub struct SinglePinMotor<D, PWM> {
    dir: D,
    pwm: PWM,
    direction: Option<Direction>,
    power: Power,
    polarity: i32,
}

impl<D, PWM> SinglePinMotor<D, PWM>
where
    D: OutputPin,
    PWM: SetDutyCycle,
{
    /// Create a new driver with normal wiring polarity.
    pub fn new(dir: D, pwm: PWM) -> Self {
        Self {
            dir,
            pwm,
            direction: None,
            power: Power::ZERO,
            polarity: 1,
        }
    }

    /// Flip the wiring polarity so `Forward` drives the pin low.
    pub fn reversed(mut self) -> Self {
        self.polarity = -1;
        self
    }

    /// Set the polarity multiplier (-1 flips directions, anything else keeps them).
    pub fn set_polarity(&mut self, multiplier: i32) {
        self.polarity = if multiplier < 0 { -1 } else { 1 };
        self.direction = None;
    }

    /// Release the underlying pin and PWM channel.
    pub fn into_parts(self) -> (D, PWM) {
        (self.dir, self.pwm)
    }
}

impl<D, PWM> MotorDrive for SinglePinMotor<D, PWM>
where
    D: OutputPin,
    PWM: SetDutyCycle,
{
    fn set_direction(&mut self, direction: Direction) -> Result<(), MotorError> {
        if self.direction == Some(direction) {
            return Ok(());
        }

        let effective = if self.polarity < 0 {
            direction.flipped()
        } else {
            direction
        };

        // A single pin cannot encode Stopped; leave it at Reverse level and
        // rely on zero power.
        match effective {
            Direction::Forward => self.dir.set_high().map_err(|_| MotorError::PinError)?,
            Direction::Reverse | Direction::Stopped => {
                self.dir.set_low().map_err(|_| MotorError::PinError)?
            }
        }

        self.direction = Some(direction);
        Ok(())
    }

    fn set_power(&mut self, power: Power) -> Result<(), MotorError> {
        self.pwm
            .set_duty_cycle_fraction(power.value(), Power::MAX.value())
            .map_err(|_| MotorError::PinError)?;
        self.power = power;
        Ok(())
    }

    fn direction(&self) -> Direction {
        self.direction.unwrap_or(Direction::Stopped)
    }

    fn power(&self) -> Power {
        self.power
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.set_power(Power::ZERO)?;
        self.set_direction(Direction::Stopped)
    }
}
