//! Limit switch input.

use embedded_hal::digital::InputPin;

use crate::error::MotorError;

/// Electrical polarity of a limit switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchPolarity {
    /// Pressed reads high.
    ActiveHigh,
    /// Pressed reads low (switch pulls the line down; typical with pull-ups).
    #[default]
    ActiveLow,
}

/// Capability interface for a homing switch.
pub trait Switch {
    /// Whether the switch is currently pressed.
    fn is_pressed(&mut self) -> Result<bool, MotorError>;
}

/// A debounced-by-wiring limit switch on a digital input pin.
pub struct LimitSwitch<P> {
    pin: P,
    polarity: SwitchPolarity,
}

impl<P: InputPin> LimitSwitch<P> {
    /// Create a switch with the given polarity.
    pub fn new(pin: P, polarity: SwitchPolarity) -> Self {
        Self { pin, polarity }
    }

    /// Create an active-low switch (pressed pulls the line low).
    pub fn active_low(pin: P) -> Self {
        Self::new(pin, SwitchPolarity::ActiveLow)
    }

    /// Create an active-high switch.
    pub fn active_high(pin: P) -> Self {
        Self::new(pin, SwitchPolarity::ActiveHigh)
    }

    /// Release the underlying pin.
    pub fn into_pin(self) -> P {
        self.pin
    }
}

impl<P: InputPin> Switch for LimitSwitch<P> {
    fn is_pressed(&mut self) -> Result<bool, MotorError> {
        let high = self.pin.is_high().map_err(|_| MotorError::PinError)?;
        Ok(match self.polarity {
            SwitchPolarity::ActiveHigh => high,
            SwitchPolarity::ActiveLow => !high,
        })
    }
}
