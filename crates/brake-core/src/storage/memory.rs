use alloc::string::String;
use core::fmt::Write;

use super::{LogContents, SampleLog, StorageError};
use crate::sample::Sample;

/// RAM-backed sample log.
///
/// Holds the exact text a file-backed log would contain. Useful for tests and
/// for sessions that should not persist anything.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    text: String,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing log text, e.g. a copy of a file from another device.
    pub fn with_contents(text: &str) -> Self {
        Self {
            text: String::from(text),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl SampleLog for MemoryLog {
    fn append(&mut self, sample: &Sample) -> Result<(), StorageError> {
        let mut record = String::new();
        sample
            .write_record(&mut record)
            .map_err(|_| StorageError::append("could not format record"))?;
        record.push('\n');

        self.text.push_str(&record);
        Ok(())
    }

    fn read_all(&mut self) -> Result<LogContents, StorageError> {
        Ok(LogContents::new(self.text.clone()))
    }
}
