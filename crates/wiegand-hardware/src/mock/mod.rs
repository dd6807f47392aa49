//! Mock edge source for testing and development.
//!
//! This module provides a simulated GPIO edge source that can be driven
//! programmatically without a physical Wiegand reader.

pub mod gpio;

// Re-export commonly used types
pub use gpio::{DEFAULT_PULSE_INTERVAL, MockGpio, MockGpioHandle};
