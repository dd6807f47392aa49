//! Edge source trait definitions.
//!
//! The decoder never talks to GPIO hardware directly. It watches two pins
//! through an [`EdgeSource`], which reports falling edges (and, for drivers
//! with hardware watchdogs, inactivity timeouts) as [`PinEvent`]s.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::SourceInfo;
use std::fmt;
use tokio::time::Instant;
use wiegand_core::EventKind;

/// Highest BCM GPIO number accepted by edge sources.
pub const MAX_PIN: u8 = 53;

/// An event observed on a physical pin.
///
/// Sources only know pin numbers. Mapping pins to DATA0/DATA1 roles is the
/// decoder's job.
///
/// Every event carries the instant it happened on the wire, taken by the
/// source when it observes the edge. Inactivity windows are measured between
/// these timestamps, so a consumer that falls behind still sees the same
/// frame boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinEvent {
    /// BCM GPIO number.
    pub pin: u8,

    /// Falling edge or watchdog timeout.
    pub kind: EventKind,

    /// When the source observed the event.
    pub timestamp: Instant,
}

impl PinEvent {
    pub fn new(pin: u8, kind: EventKind, timestamp: Instant) -> Self {
        Self {
            pin,
            kind,
            timestamp,
        }
    }

    /// Falling edge on `pin`, stamped now.
    pub fn edge(pin: u8) -> Self {
        Self::new(pin, EventKind::Edge, Instant::now())
    }

    /// Watchdog timeout on `pin`, stamped now.
    pub fn timeout(pin: u8) -> Self {
        Self::new(pin, EventKind::Timeout, Instant::now())
    }
}

impl fmt::Display for PinEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::Edge => write!(f, "edge on GPIO{}", self.pin),
            EventKind::Timeout => write!(f, "timeout on GPIO{}", self.pin),
        }
    }
}

/// Source of falling-edge notifications for a set of GPIO pins.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters, or the enum wrapper
/// [`AnyEdgeSource`](crate::devices::AnyEdgeSource) where a concrete type is
/// needed (for example to move a source into a spawned task).
///
/// # Examples
///
/// ```no_run
/// use wiegand_hardware::traits::EdgeSource;
/// use wiegand_hardware::error::Result;
///
/// async fn count_edges<S: EdgeSource>(source: &mut S, pin: u8, n: usize) -> Result<()> {
///     source.watch_falling_edges(pin).await?;
///     for _ in 0..n {
///         let event = source.next_event().await?;
///         println!("{event}");
///     }
///     source.unwatch(pin).await
/// }
/// ```
pub trait EdgeSource: Send + Sync {
    /// Configure `pin` as a pulled-up input and start reporting its falling
    /// edges.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pin number is out of range
    /// - The source is disconnected
    async fn watch_falling_edges(&mut self, pin: u8) -> Result<()>;

    /// Stop reporting events for `pin`. Unwatching a pin that is not
    /// watched is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is disconnected.
    async fn unwatch(&mut self, pin: u8) -> Result<()>;

    /// Wait for the next event on any watched pin.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Disconnected` once the source can no longer
    /// produce events.
    async fn next_event(&mut self) -> Result<PinEvent>;

    /// Get information about the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be queried.
    async fn get_info(&self) -> Result<SourceInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_event_constructors() {
        assert_eq!(PinEvent::edge(17).kind, EventKind::Edge);
        assert_eq!(PinEvent::timeout(18).kind, EventKind::Timeout);
    }

    #[test]
    fn test_pin_event_display() {
        assert_eq!(PinEvent::edge(17).to_string(), "edge on GPIO17");
        assert_eq!(PinEvent::timeout(18).to_string(), "timeout on GPIO18");
    }

    #[test]
    fn test_pin_event_keeps_timestamp() {
        let at = Instant::now();
        let event = PinEvent::new(17, EventKind::Edge, at);
        assert_eq!(event.timestamp, at);
        assert_eq!(event.pin, 17);
    }
}
