//! Persistence and access decisions for decoded Wiegand cards.
//!
//! - [`CardLog`] - append-only CSV log, one row per decoded frame
//! - [`AccessList`] - allow-list of facility code / card number pairs
//!
//! # Examples
//!
//! ```no_run
//! use wiegand_core::{Codeword, extract};
//! use wiegand_storage::{AccessList, CardLog, Credential};
//!
//! # fn main() -> wiegand_storage::StorageResult<()> {
//! let mut log = CardLog::open("cards.csv")?;
//! let mut access = AccessList::new();
//! access.allow(Credential::new(42, 31337));
//!
//! let fields = extract(&Codeword::from_bit_str("00010101001111010011010011").unwrap());
//! log.append(&fields)?;
//! println!("{}", access.decide(&fields));
//! # Ok(())
//! # }
//! ```

pub mod card_log;
pub mod error;
pub mod validator;

pub use card_log::{CARD_LOG_HEADER, CardLog, CardRecord};
pub use error::{StorageError, StorageResult};
pub use validator::{AccessDecision, AccessList, Credential};
