//! Durable sample log contract.
//!
//! The calibration engine only ever appends whole records and reads the log
//! back in full at start-up, so a backend needs exactly two operations. What
//! the bytes live on (SD card, flash, a desktop file) is the backend's
//! business.

pub mod memory;

pub use memory::MemoryLog;

use alloc::string::String;
use core::iter::Enumerate;
use core::str::Lines;

use thiserror_no_std::Error;

use crate::sample::{MalformedRecordError, Sample};

/// Capacity of the message carried by a [`StorageError`]
pub const STORAGE_MESSAGE_LEN: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("failed to append record: {0}")]
    Append(heapless::String<STORAGE_MESSAGE_LEN>),
    #[error("failed to read sample log: {0}")]
    Read(heapless::String<STORAGE_MESSAGE_LEN>),
}

impl StorageError {
    pub fn append(message: &str) -> Self {
        Self::Append(bounded_message(message))
    }

    pub fn read(message: &str) -> Self {
        Self::Read(bounded_message(message))
    }
}

/// Copy as much of `message` as fits, cutting on a character boundary.
fn bounded_message(message: &str) -> heapless::String<STORAGE_MESSAGE_LEN> {
    let mut bounded = heapless::String::new();
    for ch in message.chars() {
        if bounded.push(ch).is_err() {
            break;
        }
    }
    bounded
}

/// Append-only, newline-delimited store of [`Sample`] records.
///
/// Implementations must never rewrite or drop earlier records, and a record
/// accepted by [`append`](SampleLog::append) must survive a restart.
pub trait SampleLog {
    /// Durably persist one record after all existing ones.
    fn append(&mut self, sample: &Sample) -> Result<(), StorageError>;

    /// Read the whole log. A log that does not exist yet reads as empty.
    fn read_all(&mut self) -> Result<LogContents, StorageError>;
}

impl<L: SampleLog + ?Sized> SampleLog for &mut L {
    fn append(&mut self, sample: &Sample) -> Result<(), StorageError> {
        (**self).append(sample)
    }

    fn read_all(&mut self) -> Result<LogContents, StorageError> {
        (**self).read_all()
    }
}

/// Snapshot of the raw log text.
///
/// Records are parsed lazily by [`records`](LogContents::records), which can
/// be called any number of times to restart from the first line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContents {
    text: String,
}

impl LogContents {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Iterate over the records in write order.
    pub fn records(&self) -> Records<'_> {
        Records {
            lines: self.text.lines().enumerate(),
        }
    }
}

/// Lazy record parser over a [`LogContents`].
///
/// Blank lines are skipped. A malformed line yields an error item and
/// iteration continues with the next line.
pub struct Records<'a> {
    lines: Enumerate<Lines<'a>>,
}

impl Iterator for Records<'_> {
    type Item = Result<Sample, MalformedRecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, line) in self.lines.by_ref() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            return Some(Sample::parse_record(line, index + 1));
        }
        None
    }
}
