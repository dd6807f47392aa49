use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid bit string: {0}")]
    InvalidBitString(String),

    #[error("Codeword value {value:#x} does not fit in {bit_count} bits")]
    ValueTooWide { bit_count: usize, value: u128 },
}

pub type Result<T> = std::result::Result<T, CoreError>;
