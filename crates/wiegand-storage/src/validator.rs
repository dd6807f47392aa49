//! Allow-list access decisions.
//!
//! A card is granted when its facility code and card number match an entry
//! of the [`AccessList`]. Frames of unknown format carry neither field and
//! are always denied.

use crate::error::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use wiegand_core::FieldResult;

/// A facility code and card number pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Credential {
    pub facility_code: u64,
    pub card_number: u64,
}

impl Credential {
    pub fn new(facility_code: u64, card_number: u64) -> Self {
        Self {
            facility_code,
            card_number,
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.facility_code, self.card_number)
    }
}

/// Parses `FC:CARD`, e.g. `42:31337`.
impl FromStr for Credential {
    type Err = StorageError;

    fn from_str(s: &str) -> StorageResult<Self> {
        let (fc, card) = s
            .split_once(':')
            .ok_or_else(|| StorageError::invalid_credential(s, "expected FC:CARD"))?;

        let facility_code = fc
            .trim()
            .parse()
            .map_err(|e| StorageError::invalid_credential(s, format!("facility code: {e}")))?;
        let card_number = card
            .trim()
            .parse()
            .map_err(|e| StorageError::invalid_credential(s, format!("card number: {e}")))?;

        Ok(Self::new(facility_code, card_number))
    }
}

/// Outcome of checking a card against the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Granted,
    Denied,
}

impl AccessDecision {
    pub fn is_granted(self) -> bool {
        self == AccessDecision::Granted
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccessDecision::Granted => write!(f, "Granted"),
            AccessDecision::Denied => write!(f, "Denied"),
        }
    }
}

/// Set of credentials allowed through.
///
/// # Examples
///
/// ```
/// use wiegand_core::{Codeword, extract};
/// use wiegand_storage::{AccessDecision, AccessList};
///
/// let list: AccessList = ["42:1337".parse().unwrap()].into_iter().collect();
/// let card = Codeword::from_bit_str("00010101000000101001110011").unwrap();
///
/// assert_eq!(list.decide(&extract(&card)), AccessDecision::Granted);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessList {
    allowed: HashSet<Credential>,
}

impl AccessList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `credential`. Returns false if it was already allowed.
    pub fn allow(&mut self, credential: Credential) -> bool {
        self.allowed.insert(credential)
    }

    pub fn contains(&self, credential: &Credential) -> bool {
        self.allowed.contains(credential)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Decide whether the card described by `fields` may pass.
    pub fn decide(&self, fields: &FieldResult) -> AccessDecision {
        let (Some(facility_code), Some(card_number)) = (fields.facility_code, fields.card_number)
        else {
            debug!(bits = fields.bit_count, "unknown format, denying");
            return AccessDecision::Denied;
        };

        let credential = Credential::new(facility_code, card_number);
        if self.contains(&credential) {
            AccessDecision::Granted
        } else {
            debug!(%credential, "credential not on allow-list");
            AccessDecision::Denied
        }
    }
}

impl FromIterator<Credential> for AccessList {
    fn from_iter<I: IntoIterator<Item = Credential>>(iter: I) -> Self {
        Self {
            allowed: iter.into_iter().collect(),
        }
    }
}

impl Extend<Credential> for AccessList {
    fn extend<I: IntoIterator<Item = Credential>>(&mut self, iter: I) {
        self.allowed.extend(iter);
    }
}
