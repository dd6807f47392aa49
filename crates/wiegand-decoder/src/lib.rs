//! Wiegand frame decoding.
//!
//! Turns falling edges on the DATA0/DATA1 lines into completed codewords.
//! The crate is split into a pure state machine and the task that drives it:
//!
//! - [`FrameAccumulator`]: synchronous `Idle`/`Accumulating` state machine,
//!   testable without any timing.
//! - [`watchdog`]: per-line inactivity deadlines.
//! - [`WiegandDecoder`]: attaches to an edge source and runs the accumulator,
//!   the watchdogs and a [`CodewordSink`] inside one Tokio task.
//!
//! Field extraction is not done here; sinks call
//! [`wiegand_core::extract`] on the codewords they receive.

pub mod accumulator;
pub mod config;
pub mod decoder;
pub mod error;
pub mod sink;
pub mod watchdog;

pub use accumulator::{FrameAccumulator, FrameState, TimeoutFlags, Transition};
pub use config::DecoderConfig;
pub use decoder::{DecoderHandle, DecoderStats, WiegandDecoder};
pub use error::{DecoderError, Result};
pub use sink::{ChannelSink, CodewordSink};
