//! Wiegand format table and field extraction.
//!
//! Extraction is a pure, total function of a [`Codeword`]: it never fails
//! and never looks at how the codeword was framed. Known bit lengths are
//! sliced into facility code and card number using the static
//! [`FORMATS`] table; any other length yields a result whose numeric fields
//! are `None`.
//!
//! # Examples
//!
//! ```
//! use wiegand_core::{Codeword, WiegandFormat, extract};
//!
//! // H10301: even parity, 8-bit facility 127, 16-bit card 31337, odd parity
//! let codeword = Codeword::from_bit_str("00111111101111010011010011").unwrap();
//! let fields = extract(&codeword);
//!
//! assert_eq!(fields.format, Some(WiegandFormat::H10301));
//! assert_eq!(fields.facility_code, Some(127));
//! assert_eq!(fields.card_number, Some(31337));
//! assert_eq!(fields.padded_hex, "0000002004FEF4D3");
//! ```

use crate::Codeword;
use crate::constants::{
    CORPORATE_1000_HEADER, H10301_HEADER, H10304_HEADER, NOT_AVAILABLE, PADDED_HEX_WIDTH,
    UNKNOWN_HEADER,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Known Wiegand card formats, keyed by bit length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WiegandFormat {
    /// 26-bit HID standard format.
    H10301,
    /// 35-bit HID Corporate 1000.
    Corporate1000,
    /// 37-bit HID format with 16-bit facility code.
    H10304,
}

impl WiegandFormat {
    /// Look up the format transmitted with `bit_count` bits.
    #[must_use]
    pub fn from_bit_count(bit_count: usize) -> Option<Self> {
        FormatDescriptor::for_bit_count(bit_count).map(|d| d.format)
    }

    /// The slice table entry for this format.
    #[must_use]
    pub fn descriptor(self) -> &'static FormatDescriptor {
        match self {
            WiegandFormat::H10301 => &FORMATS[0],
            WiegandFormat::Corporate1000 => &FORMATS[1],
            WiegandFormat::H10304 => &FORMATS[2],
        }
    }

    /// Frame length in bits.
    #[must_use]
    pub fn bit_count(self) -> usize {
        self.descriptor().bit_count
    }
}

impl fmt::Display for WiegandFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WiegandFormat::H10301 => write!(f, "H10301"),
            WiegandFormat::Corporate1000 => write!(f, "Corporate 1000"),
            WiegandFormat::H10304 => write!(f, "H10304"),
        }
    }
}

/// Bit layout of one Wiegand format.
///
/// Ranges are half-open and 0-indexed from the MSB of the raw codeword.
/// `header` is prepended to the raw bits before hex encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub format: WiegandFormat,
    pub bit_count: usize,
    pub facility_code: Range<usize>,
    pub card_number: Range<usize>,
    pub card_number_no_facility: Range<usize>,
    pub header: &'static str,
}

impl FormatDescriptor {
    /// Find the descriptor for a frame length, if the length is known.
    #[must_use]
    pub fn for_bit_count(bit_count: usize) -> Option<&'static FormatDescriptor> {
        FORMATS.iter().find(|d| d.bit_count == bit_count)
    }
}

/// Static format table. New formats only need a new entry here.
pub static FORMATS: [FormatDescriptor; 3] = [
    FormatDescriptor {
        format: WiegandFormat::H10301,
        bit_count: 26,
        facility_code: 1..9,
        card_number: 9..25,
        card_number_no_facility: 1..25,
        header: H10301_HEADER,
    },
    FormatDescriptor {
        format: WiegandFormat::Corporate1000,
        bit_count: 35,
        facility_code: 2..14,
        card_number: 14..34,
        card_number_no_facility: 2..34,
        header: CORPORATE_1000_HEADER,
    },
    FormatDescriptor {
        format: WiegandFormat::H10304,
        bit_count: 37,
        facility_code: 1..17,
        card_number: 17..36,
        card_number_no_facility: 1..36,
        header: H10304_HEADER,
    },
];

/// Fields extracted from one codeword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResult {
    /// Raw frame length.
    pub bit_count: usize,

    /// Detected format, `None` for unknown lengths.
    pub format: Option<WiegandFormat>,

    pub facility_code: Option<u64>,

    pub card_number: Option<u64>,

    /// Facility code and card number read as a single number.
    pub card_number_no_facility: Option<u64>,

    /// Raw codeword, exactly `bit_count` characters.
    pub raw_binary: String,

    /// Header bits followed by the raw codeword.
    pub padded_binary: String,

    /// `padded_binary` as uppercase hex, at least 16 digits.
    pub padded_hex: String,
}

impl FieldResult {
    /// Whether the codeword matched a known format.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.format.is_some()
    }

    #[must_use]
    pub fn facility_code_display(&self) -> String {
        display_field(self.facility_code)
    }

    #[must_use]
    pub fn card_number_display(&self) -> String {
        display_field(self.card_number)
    }

    #[must_use]
    pub fn card_number_no_facility_display(&self) -> String {
        display_field(self.card_number_no_facility)
    }
}

impl fmt::Display for FieldResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bits FC: {} Card: {} Hex: {}",
            self.bit_count,
            self.facility_code_display(),
            self.card_number_display(),
            self.padded_hex
        )
    }
}

fn display_field(field: Option<u64>) -> String {
    field.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Extract facility code, card number and padded hex from a codeword.
///
/// Total for every codeword, including empty ones and lengths with no
/// descriptor.
#[must_use]
pub fn extract(codeword: &Codeword) -> FieldResult {
    let bits = codeword.bits();
    let descriptor = FormatDescriptor::for_bit_count(bits.len());

    let slice = |range: &Range<usize>| read_bits(&bits[range.clone()]);

    let (facility_code, card_number, card_number_no_facility, header) = match descriptor {
        Some(d) => (
            Some(slice(&d.facility_code)),
            Some(slice(&d.card_number)),
            Some(slice(&d.card_number_no_facility)),
            d.header,
        ),
        None => (None, None, None, UNKNOWN_HEADER),
    };

    let raw_binary = codeword.bit_string();
    let padded_binary = format!("{header}{raw_binary}");
    let padded_hex = binary_to_hex(&padded_binary);

    FieldResult {
        bit_count: bits.len(),
        format: descriptor.map(|d| d.format),
        facility_code,
        card_number,
        card_number_no_facility,
        raw_binary,
        padded_binary,
        padded_hex,
    }
}

fn read_bits(bits: &[bool]) -> u64 {
    bits.iter().fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit))
}

/// Render a binary string as uppercase hex with no width limit.
///
/// Leading zero digits are dropped and the result is then left-padded to
/// [`PADDED_HEX_WIDTH`], so the value is never truncated.
fn binary_to_hex(binary: &str) -> String {
    let pad = (4 - binary.len() % 4) % 4;
    let aligned: Vec<u8> = std::iter::repeat_n(b'0', pad)
        .chain(binary.bytes())
        .collect();

    let digits: String = aligned
        .chunks(4)
        .map(|nibble| {
            let value = nibble
                .iter()
                .fold(0u32, |acc, &b| (acc << 1) | u32::from(b == b'1'));
            char::from_digit(value, 16)
                .unwrap_or('0')
                .to_ascii_uppercase()
        })
        .skip_while(|&c| c == '0')
        .collect();

    format!("{digits:0>width$}", width = PADDED_HEX_WIDTH)
}
