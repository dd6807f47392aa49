use crate::{Result, error::CoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical role of a Wiegand data wire.
///
/// A falling edge on `Zero` (DATA0, green wire) encodes a 0 bit and a
/// falling edge on `One` (DATA1, white wire) encodes a 1 bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Line {
    Zero,
    One,
}

impl Line {
    /// Bit value signalled by an edge on this line.
    #[inline]
    #[must_use]
    pub fn bit(self) -> bool {
        matches!(self, Line::One)
    }

    /// The opposite line.
    #[inline]
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Line::Zero => Line::One,
            Line::One => Line::Zero,
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Line::Zero => write!(f, "DATA0"),
            Line::One => write!(f, "DATA1"),
        }
    }
}

/// What happened on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A falling transition was observed.
    Edge,
    /// No edge for the configured inactivity window.
    Timeout,
}

/// A single event delivered to the frame accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineEvent {
    pub line: Line,
    pub kind: EventKind,
}

impl LineEvent {
    /// Falling edge on `line`.
    #[must_use]
    pub fn edge(line: Line) -> Self {
        Self {
            line,
            kind: EventKind::Edge,
        }
    }

    /// Inactivity timeout on `line`.
    #[must_use]
    pub fn timeout(line: Line) -> Self {
        Self {
            line,
            kind: EventKind::Timeout,
        }
    }
}

impl fmt::Display for LineEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            EventKind::Edge => write!(f, "edge on {}", self.line),
            EventKind::Timeout => write!(f, "timeout on {}", self.line),
        }
    }
}

/// A completed Wiegand codeword.
///
/// Bits are stored in reception order, so index 0 is the MSB. There is no
/// width limit: frames longer than any integer type keep every bit, and
/// [`Codeword::value`] reports `None` instead of truncating.
///
/// # Examples
///
/// ```
/// use wiegand_core::Codeword;
///
/// let codeword = Codeword::from_value(4, 0b1010).unwrap();
/// assert_eq!(codeword.bit_count(), 4);
/// assert_eq!(codeword.bit_string(), "1010");
/// assert_eq!(codeword.value(), Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Codeword {
    bits: Vec<bool>,
}

impl Codeword {
    /// Build a codeword from bits in reception order.
    #[must_use]
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Build a codeword of `bit_count` bits holding `value`.
    ///
    /// # Errors
    /// Returns `CoreError::ValueTooWide` if `value` has significant bits
    /// beyond `bit_count`.
    pub fn from_value(bit_count: usize, value: u128) -> Result<Self> {
        if bit_count < 128 && value >> bit_count != 0 {
            return Err(CoreError::ValueTooWide { bit_count, value });
        }

        let bits = (0..bit_count)
            .rev()
            .map(|shift| shift < 128 && (value >> shift) & 1 == 1)
            .collect();

        Ok(Self { bits })
    }

    /// Parse a string of `0` and `1` characters, MSB first.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidBitString` on any other character.
    pub fn from_bit_str(s: &str) -> Result<Self> {
        let bits = s
            .trim()
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CoreError::InvalidBitString(format!(
                    "unexpected character {other:?} in {s:?}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { bits })
    }

    /// Number of bits received.
    #[inline]
    #[must_use]
    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bits in reception order.
    #[must_use]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Numeric value, MSB first. `None` if wider than 128 bits.
    #[must_use]
    pub fn value(&self) -> Option<u128> {
        if self.bits.len() > 128 {
            return None;
        }
        Some(
            self.bits
                .iter()
                .fold(0u128, |acc, &bit| (acc << 1) | u128::from(bit)),
        )
    }

    /// Canonical binary rendering: exactly `bit_count` characters.
    #[must_use]
    pub fn bit_string(&self) -> String {
        self.bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-bit {}", self.bit_count(), self.bit_string())
    }
}

impl std::str::FromStr for Codeword {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Codeword::from_bit_str(s)
    }
}
