//! Error types for edge source operations.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur while talking to a GPIO edge source.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Source is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Pin number rejected by the source.
    #[error("Invalid pin {pin}: {message}")]
    InvalidPin { pin: u8, message: String },
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new invalid pin error.
    pub fn invalid_pin(pin: u8, message: impl Into<String>) -> Self {
        Self::InvalidPin {
            pin,
            message: message.into(),
        }
    }
}
