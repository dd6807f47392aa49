use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the card log and access list.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the log file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The log file is not valid CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An existing log file does not start with the card log header
    #[error("Invalid card log header in {}: {found:?}", path.display())]
    InvalidHeader { path: PathBuf, found: String },

    /// The last record id leaves no room for another record
    #[error("Card log {} has no record ids left after {last_id}", path.display())]
    IdOverflow { path: PathBuf, last_id: u64 },

    /// An allow-list entry is not of the form `FC:CARD`
    #[error("Invalid credential {input:?}: {reason}")]
    InvalidCredential { input: String, reason: String },
}

impl StorageError {
    pub fn invalid_credential(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCredential {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_header_display() {
        let err = StorageError::InvalidHeader {
            path: PathBuf::from("cards.csv"),
            found: "name,age".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid card log header in cards.csv: \"name,age\""
        );
    }

    #[test]
    fn test_id_overflow_display() {
        let err = StorageError::IdOverflow {
            path: PathBuf::from("cards.csv"),
            last_id: u64::MAX,
        };
        assert_eq!(
            err.to_string(),
            "Card log cards.csv has no record ids left after 18446744073709551615"
        );
    }

    #[test]
    fn test_invalid_credential_display() {
        let err = StorageError::invalid_credential("42", "expected FC:CARD");
        assert_eq!(err.to_string(), "Invalid credential \"42\": expected FC:CARD");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StorageError = io.into();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
