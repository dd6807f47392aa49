//! Core types for decoding Wiegand access-control codewords.
//!
//! This crate holds everything that is independent of timing and hardware:
//! the line/event vocabulary shared by the edge source and the decoder, the
//! [`Codeword`] produced by frame accumulation, and the pure field extractor
//! that turns a codeword into facility code, card number and padded hex.

pub mod constants;
pub mod error;
pub mod format;
pub mod types;

pub use error::{CoreError, Result};
pub use format::{FieldResult, FormatDescriptor, WiegandFormat, extract};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
