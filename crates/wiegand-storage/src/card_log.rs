//! Append-only CSV log of decoded cards.
//!
//! One row per completed frame:
//!
//! ```text
//! id,bit_length,wiegand_binary,wiegand_hex,fac_code,card_num,card_num_no_fac
//! 1,26,000000010000000000100010101000000101001110011,0000002004540A73,42,1337,2753849
//! ```
//!
//! `wiegand_binary` holds the header-padded binary and `wiegand_hex` its hex
//! rendering. Fields a format does not define are written as `NA`. Ids are
//! never reused within a file: a reopened log continues from the id of its
//! last row. A log deleted while open is recreated on the next append.

use crate::error::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use wiegand_core::FieldResult;

/// Column names, in file order.
pub const CARD_LOG_HEADER: [&str; 7] = [
    "id",
    "bit_length",
    "wiegand_binary",
    "wiegand_hex",
    "fac_code",
    "card_num",
    "card_num_no_fac",
];

/// Column that identifies a file as a card log.
const SIGNATURE_COLUMN: &str = "wiegand_binary";

/// One row of the card log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: u64,
    pub bit_length: usize,
    pub wiegand_binary: String,
    pub wiegand_hex: String,
    pub fac_code: String,
    pub card_num: String,
    pub card_num_no_fac: String,
}

impl CardRecord {
    /// Build the row for `fields` under `id`.
    pub fn from_fields(id: u64, fields: &FieldResult) -> Self {
        Self {
            id,
            bit_length: fields.bit_count,
            wiegand_binary: fields.padded_binary.clone(),
            wiegand_hex: fields.padded_hex.clone(),
            fac_code: fields.facility_code_display(),
            card_num: fields.card_number_display(),
            card_num_no_fac: fields.card_number_no_facility_display(),
        }
    }
}

/// Handle to a card log file.
///
/// # Examples
///
/// ```no_run
/// use wiegand_core::{Codeword, extract};
/// use wiegand_storage::CardLog;
///
/// # fn main() -> wiegand_storage::StorageResult<()> {
/// let mut log = CardLog::open("cards.csv")?;
/// let codeword = Codeword::from_bit_str("00010101000000101001110011").unwrap();
///
/// let record = log.append(&extract(&codeword))?;
/// println!("logged card #{}", record.id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CardLog {
    path: PathBuf,
    last_id: u64,
}

impl CardLog {
    /// Open the log at `path`, creating it with a header if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidHeader` if the file exists but is not
    /// a card log, or an I/O or CSV error if it cannot be read or created.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            Self::create(&path)?;
            info!(path = %path.display(), "created card log");
            return Ok(Self { path, last_id: 0 });
        }

        Self::check_header(&path)?;
        let last_id = Self::read_last_id(&path)?;
        debug!(path = %path.display(), last_id, "opened card log");

        Ok(Self { path, last_id })
    }

    /// Append a row for `fields` and sync it to disk.
    ///
    /// A log that was deleted or rotated away since the last append is
    /// recreated with its header and ids restart at 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be written or synced, if the file
    /// was replaced by one that is not a card log, or if the last id is
    /// `u64::MAX`.
    pub fn append(&mut self, fields: &FieldResult) -> StorageResult<CardRecord> {
        self.revalidate()?;

        let id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| StorageError::IdOverflow {
                path: self.path.clone(),
                last_id: self.last_id,
            })?;
        let record = CardRecord::from_fields(id, fields);

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = writer_builder().has_headers(false).from_writer(file);
        writer.serialize(&record)?;
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;

        self.last_id = record.id;
        debug!(id = record.id, bits = record.bit_length, "card logged");
        Ok(record)
    }

    /// Read every row of the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a row is malformed.
    pub fn records(&self) -> StorageResult<Vec<CardRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let records = reader
            .deserialize()
            .collect::<Result<Vec<CardRecord>, csv::Error>>()?;
        Ok(records)
    }

    /// Id of the most recent row, 0 for an empty log.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn revalidate(&mut self) -> StorageResult<()> {
        if self.path.exists() {
            return Self::check_header(&self.path);
        }

        Self::create(&self.path)?;
        warn!(
            path = %self.path.display(),
            previous_id = self.last_id,
            "card log disappeared, recreated it"
        );
        self.last_id = 0;
        Ok(())
    }

    fn create(path: &Path) -> StorageResult<()> {
        let mut writer = writer_builder().from_path(path)?;
        writer.write_record(CARD_LOG_HEADER)?;
        writer.flush()?;
        Ok(())
    }

    fn check_header(path: &Path) -> StorageResult<()> {
        let mut first_line = String::new();
        BufReader::new(File::open(path)?).read_line(&mut first_line)?;

        if first_line.contains(SIGNATURE_COLUMN) {
            Ok(())
        } else {
            Err(StorageError::InvalidHeader {
                path: path.to_path_buf(),
                found: first_line.trim_end().to_string(),
            })
        }
    }

    fn read_last_id(path: &Path) -> StorageResult<u64> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut last = None;
        for row in reader.records() {
            last = Some(row?);
        }

        // A header-only log ends on the "id" column name.
        Ok(last
            .and_then(|row| row.get(0).and_then(|id| id.trim().parse().ok()))
            .unwrap_or(0))
    }
}

fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.terminator(csv::Terminator::Any(b'\n'));
    builder
}
