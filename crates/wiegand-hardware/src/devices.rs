//! Enum wrapper for edge source dispatch.
//!
//! Native `async fn` in traits is not object-safe, so `Box<dyn EdgeSource>`
//! is not available. [`AnyEdgeSource`] gives the decoder a single concrete
//! type to move into its task while still dispatching through the
//! [`EdgeSource`] trait.
//!
//! # Examples
//!
//! ```
//! use wiegand_hardware::devices::AnyEdgeSource;
//! use wiegand_hardware::mock::MockGpio;
//!
//! let (gpio, _handle) = MockGpio::new();
//! let source = AnyEdgeSource::Mock(gpio);
//! ```

use crate::mock::MockGpio;
use crate::traits::{EdgeSource, PinEvent};
use crate::{Result, SourceInfo};

/// Enum wrapper for edge source dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyEdgeSource {
    /// Mock GPIO for development and testing.
    Mock(MockGpio),
}

impl From<MockGpio> for AnyEdgeSource {
    fn from(gpio: MockGpio) -> Self {
        Self::Mock(gpio)
    }
}

impl EdgeSource for AnyEdgeSource {
    async fn watch_falling_edges(&mut self, pin: u8) -> Result<()> {
        match self {
            Self::Mock(source) => source.watch_falling_edges(pin).await,
        }
    }

    async fn unwatch(&mut self, pin: u8) -> Result<()> {
        match self {
            Self::Mock(source) => source.unwatch(pin).await,
        }
    }

    async fn next_event(&mut self) -> Result<PinEvent> {
        match self {
            Self::Mock(source) => source.next_event().await,
        }
    }

    async fn get_info(&self) -> Result<SourceInfo> {
        match self {
            Self::Mock(source) => source.get_info().await,
        }
    }
}
