//! Mock GPIO edge source.
//!
//! [`MockGpio`] plays the role of the GPIO driver and [`MockGpioHandle`]
//! plays the role of the card reader: the handle emits falling edges that
//! the source reports to whoever is watching.

use crate::{
    HardwareError, Result,
    traits::{EdgeSource, MAX_PIN, PinEvent},
    types::SourceInfo,
};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::trace;
use wiegand_core::Codeword;

/// Spacing between pulses when presenting a codeword.
///
/// Readers typically hold a pulse for 50-100µs and repeat every 1-2ms.
pub const DEFAULT_PULSE_INTERVAL: Duration = Duration::from_millis(1);

const CHANNEL_CAPACITY: usize = 256;

/// Mock GPIO edge source.
///
/// # Examples
///
/// ```
/// use wiegand_hardware::mock::MockGpio;
/// use wiegand_hardware::traits::EdgeSource;
///
/// #[tokio::main]
/// async fn main() -> wiegand_hardware::Result<()> {
///     let (mut gpio, handle) = MockGpio::new();
///     gpio.watch_falling_edges(17).await?;
///
///     handle.pulse(17).await?;
///     assert_eq!(gpio.next_event().await?.pin, 17);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockGpio {
    /// Channel receiver for pin events
    event_rx: mpsc::Receiver<PinEvent>,

    /// Device name
    name: String,

    /// Pins reporting events
    watched: BTreeSet<u8>,
}

impl MockGpio {
    /// Create a new mock GPIO source with the default name.
    ///
    /// Returns a tuple of (MockGpio, MockGpioHandle) where the handle
    /// simulates the reader driving the data lines.
    pub fn new() -> (Self, MockGpioHandle) {
        Self::with_name("Mock GPIO".to_string())
    }

    /// Create a new mock GPIO source with a custom name.
    pub fn with_name(name: String) -> (Self, MockGpioHandle) {
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let gpio = Self {
            event_rx,
            name: name.clone(),
            watched: BTreeSet::new(),
        };

        let handle = MockGpioHandle {
            event_tx,
            name,
            pulse_interval: DEFAULT_PULSE_INTERVAL,
        };

        (gpio, handle)
    }

    /// Whether `pin` is currently reporting events.
    pub fn is_watched(&self, pin: u8) -> bool {
        self.watched.contains(&pin)
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new().0
    }
}

impl EdgeSource for MockGpio {
    async fn watch_falling_edges(&mut self, pin: u8) -> Result<()> {
        if pin > MAX_PIN {
            return Err(HardwareError::invalid_pin(
                pin,
                format!("GPIO must be 0-{MAX_PIN}"),
            ));
        }
        self.watched.insert(pin);
        Ok(())
    }

    async fn unwatch(&mut self, pin: u8) -> Result<()> {
        self.watched.remove(&pin);
        Ok(())
    }

    async fn next_event(&mut self) -> Result<PinEvent> {
        loop {
            let event = self
                .event_rx
                .recv()
                .await
                .ok_or_else(|| HardwareError::disconnected("GPIO event channel closed"))?;

            if self.watched.contains(&event.pin) {
                return Ok(event);
            }
            trace!(pin = event.pin, "dropping event on unwatched pin");
        }
    }

    async fn get_info(&self) -> Result<SourceInfo> {
        Ok(SourceInfo::new(self.name.clone(), "mock")
            .with_watched_pins(self.watched.iter().copied().collect()))
    }
}

/// Handle for driving a mock GPIO source.
///
/// # Examples
///
/// ```
/// use wiegand_core::Codeword;
/// use wiegand_hardware::mock::MockGpio;
/// use wiegand_hardware::traits::EdgeSource;
///
/// #[tokio::main]
/// async fn main() -> wiegand_hardware::Result<()> {
///     let (mut gpio, handle) = MockGpio::new();
///     gpio.watch_falling_edges(17).await?;
///     gpio.watch_falling_edges(18).await?;
///
///     let codeword = Codeword::from_bit_str("10").unwrap();
///     handle.present_codeword(17, 18, &codeword).await?;
///
///     assert_eq!(gpio.next_event().await?.pin, 18);
///     assert_eq!(gpio.next_event().await?.pin, 17);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockGpioHandle {
    /// Channel sender for pin events
    event_tx: mpsc::Sender<PinEvent>,

    /// Device name
    name: String,

    /// Delay between consecutive pulses of a codeword
    pulse_interval: Duration,
}

impl MockGpioHandle {
    /// Emit one falling edge on `pin`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has been dropped.
    pub async fn pulse(&self, pin: u8) -> Result<()> {
        self.send(PinEvent::edge(pin)).await
    }

    /// Emit a watchdog timeout on `pin`, as a driver with hardware
    /// watchdogs would.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has been dropped.
    pub async fn fire_watchdog(&self, pin: u8) -> Result<()> {
        self.send(PinEvent::timeout(pin)).await
    }

    /// Emit the edges of `codeword`, MSB first, one pulse per bit.
    ///
    /// Zero bits pulse `zero_pin` and one bits pulse `one_pin`. Pulses are
    /// spaced by the pulse interval; the frame ends when the caller stops
    /// pulsing.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has been dropped.
    pub async fn present_codeword(
        &self,
        zero_pin: u8,
        one_pin: u8,
        codeword: &Codeword,
    ) -> Result<()> {
        for (i, &bit) in codeword.bits().iter().enumerate() {
            if i > 0 && !self.pulse_interval.is_zero() {
                tokio::time::sleep(self.pulse_interval).await;
            }
            self.pulse(if bit { one_pin } else { zero_pin }).await?;
        }
        Ok(())
    }

    /// Change the delay between pulses of a codeword.
    pub fn set_pulse_interval(&mut self, interval: Duration) {
        self.pulse_interval = interval;
    }

    /// Get the delay between pulses of a codeword.
    pub fn pulse_interval(&self) -> Duration {
        self.pulse_interval
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the source side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.event_tx.is_closed()
    }

    async fn send(&self, event: PinEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| HardwareError::disconnected("GPIO event channel closed"))
    }
}
