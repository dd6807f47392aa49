//! Core constants for Wiegand decoding.
//!
//! This module collects the timing defaults used by the decoder and the
//! fixed header prefixes used by the field extractor to re-express raw
//! Wiegand frames as padded card values.
//!
//! # Header Prefixes
//!
//! The header bits are not transmitted by the reader. They are prepended to
//! the raw codeword so that 26, 35 and 37-bit frames line up with the padded
//! representation used by card-encoding tools:
//!
//! | Format | Raw bits | Header | Padded bits |
//! |--------|----------|--------|-------------|
//! | H10301 | 26 | `0000000100000000001` | 45 |
//! | Corporate 1000 | 35 | `0000000101` | 45 |
//! | H10304 | 37 | `00000000` | 45 |
//! | unknown | n | `0` | n + 1 |
//!
//! # Usage
//!
//! ```
//! use wiegand_core::constants::*;
//! use std::time::Duration;
//!
//! let timeout = Duration::from_millis(DEFAULT_BIT_TIMEOUT_MS);
//! assert_eq!(timeout, Duration::from_millis(5));
//! assert_eq!(H10301_HEADER.len() + 26, 45);
//! ```

// ============================================================================
// Timing
// ============================================================================

/// Default per-line inactivity window in milliseconds.
///
/// A frame ends once both lines have been silent for this long. Readers
/// clock bits every ~2ms, so 5ms leaves margin without merging back-to-back
/// card presentations.
pub const DEFAULT_BIT_TIMEOUT_MS: u64 = 5;

// ============================================================================
// Wiring
// ============================================================================

/// Default GPIO for the DATA0 (green) wire.
pub const DEFAULT_ZERO_PIN: u8 = 17;

/// Default GPIO for the DATA1 (white) wire.
pub const DEFAULT_ONE_PIN: u8 = 18;

// ============================================================================
// Field extraction
// ============================================================================

/// Header prepended to 26-bit H10301 frames.
pub const H10301_HEADER: &str = "0000000100000000001";

/// Header prepended to 35-bit Corporate 1000 frames.
pub const CORPORATE_1000_HEADER: &str = "0000000101";

/// Header prepended to 37-bit H10304 frames.
pub const H10304_HEADER: &str = "00000000";

/// Header prepended to frames of unknown length.
pub const UNKNOWN_HEADER: &str = "0";

/// Minimum number of hex digits in a padded card value.
pub const PADDED_HEX_WIDTH: usize = 16;

/// Rendering used for fields that cannot be extracted.
pub const NOT_AVAILABLE: &str = "NA";
