//! Error types for decoder setup.
//!
//! Decoding itself never fails: malformed frames surface as codewords of an
//! unexpected length. Errors only come from configuration and from the edge
//! source while attaching.

use wiegand_hardware::HardwareError;

/// Result type alias for decoder operations.
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Errors raised while building or attaching a decoder.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    /// Configuration rejected before touching hardware.
    #[error("Invalid decoder configuration: {message}")]
    InvalidConfig { message: String },

    /// The edge source refused to watch a pin.
    #[error("Edge source error: {0}")]
    Hardware(#[from] HardwareError),
}

impl DecoderError {
    /// Create a new invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
