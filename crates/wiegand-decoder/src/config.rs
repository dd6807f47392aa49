//! Decoder configuration.

use crate::error::{DecoderError, Result};
use std::time::Duration;
use wiegand_core::Line;
use wiegand_core::constants::{DEFAULT_BIT_TIMEOUT_MS, DEFAULT_ONE_PIN, DEFAULT_ZERO_PIN};

/// Wiring and timing of one decoder.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wiegand_decoder::DecoderConfig;
///
/// let config = DecoderConfig::new(17, 18).with_bit_timeout(Duration::from_millis(10));
/// assert!(config.validate().is_ok());
///
/// assert!(DecoderConfig::new(17, 17).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// GPIO wired to DATA0 (green).
    pub zero_pin: u8,

    /// GPIO wired to DATA1 (white).
    pub one_pin: u8,

    /// Inactivity window that ends a frame once both lines are silent.
    pub bit_timeout: Duration,
}

impl DecoderConfig {
    /// Configuration for the given pins with the default bit timeout.
    pub fn new(zero_pin: u8, one_pin: u8) -> Self {
        Self {
            zero_pin,
            one_pin,
            bit_timeout: Duration::from_millis(DEFAULT_BIT_TIMEOUT_MS),
        }
    }

    /// Set the inactivity window.
    pub fn with_bit_timeout(mut self, bit_timeout: Duration) -> Self {
        self.bit_timeout = bit_timeout;
        self
    }

    /// Check the configuration before attaching to hardware.
    ///
    /// # Errors
    ///
    /// Returns `DecoderError::InvalidConfig` if both lines share a pin or
    /// the bit timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.zero_pin == self.one_pin {
            return Err(DecoderError::invalid_config(format!(
                "DATA0 and DATA1 must use different pins, both are {}",
                self.zero_pin
            )));
        }
        if self.bit_timeout.is_zero() {
            return Err(DecoderError::invalid_config("bit timeout must be non-zero"));
        }
        Ok(())
    }

    /// Map a pin to its line role.
    pub fn line_for_pin(&self, pin: u8) -> Option<Line> {
        if pin == self.zero_pin {
            Some(Line::Zero)
        } else if pin == self.one_pin {
            Some(Line::One)
        } else {
            None
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ZERO_PIN, DEFAULT_ONE_PIN)
    }
}
