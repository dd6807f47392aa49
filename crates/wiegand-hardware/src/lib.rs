//! Edge source abstraction for Wiegand readers.
//!
//! A Wiegand reader drives two open-collector data lines. This crate hides
//! how falling edges on those lines are observed behind the [`EdgeSource`]
//! trait so the decoder can run against real GPIO drivers or the
//! [`MockGpio`] simulator alike.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Enum dispatch**: [`AnyEdgeSource`] provides a concrete type where trait
//!   objects are not available.
//! - **Thread-safe**: Sources require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with [`HardwareError`].
//!
//! # Examples
//!
//! ```no_run
//! use wiegand_hardware::traits::EdgeSource;
//! use wiegand_hardware::error::Result;
//!
//! async fn wait_for_bit<S: EdgeSource>(source: &mut S) -> Result<u8> {
//!     let event = source.next_event().await?;
//!     Ok(event.pin)
//! }
//! ```
//!
//! [`EdgeSource`]: traits::EdgeSource
//! [`MockGpio`]: mock::MockGpio
//! [`AnyEdgeSource`]: devices::AnyEdgeSource

pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use devices::AnyEdgeSource;
pub use error::{HardwareError, Result};
pub use traits::{EdgeSource, MAX_PIN, PinEvent};
pub use types::SourceInfo;
