//! Sample log backed by a plain text file on the host filesystem.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use brake_core::sample::Sample;
use brake_core::storage::{LogContents, SampleLog, StorageError};
use log::error;

pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    /// The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `record` and sync it to disk.
    ///
    /// A failed append cuts the file back to its previous length, so a record
    /// reported as not written is never replayed by a later rebuild.
    fn append_record(&self, record: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;
        let original_len = file.metadata()?.len();

        rollback_on_error(&mut file, original_len, |file| {
            // A record torn by a power cut must not swallow the next one.
            if !ends_with_newline(file)? {
                file.write_all(b"\n")?;
            }
            file.write_all(record.as_bytes())?;
            file.sync_data()
        })
    }
}

/// Run `write` on `file`, truncating it to `original_len` if `write` fails.
fn rollback_on_error<F>(file: &mut File, original_len: u64, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let result = write(file);
    if result.is_err() {
        if let Err(e) = file.set_len(original_len).and_then(|()| file.sync_data()) {
            error!("Failed to roll back partial append: {}", e);
        }
    }
    result
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl SampleLog for FileLog {
    fn append(&mut self, sample: &Sample) -> Result<(), StorageError> {
        let record = format!("{}\n", sample);
        self.append_record(&record)
            .map_err(|e| StorageError::append(&e.to_string()))
    }

    fn read_all(&mut self) -> Result<LogContents, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(LogContents::new(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(LogContents::default()),
            Err(e) => Err(StorageError::read(&e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brake_core::calibration::CalibrationRegistry;
    use brake_core::sample::Gauge;
    use tempfile::tempdir;

    fn gauge(id: u32) -> Gauge {
        Gauge::new(id).unwrap()
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let mut log = FileLog::new(dir.path().join("bending_data.txt"));

        let contents = log.read_all().unwrap();
        assert_eq!(contents.records().count(), 0);
        assert!(!log.path().exists());
    }

    #[test]
    fn test_append_creates_and_extends_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bending_data.txt");
        let mut log = FileLog::new(&path);

        log.append(&Sample::new(gauge(16), 90.0, 5.96)).unwrap();
        log.append(&Sample::new(gauge(18), 100.5, 6.25)).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "16,90,5.96\n18,100.5,6.25\n"
        );
    }

    #[test]
    fn test_torn_last_line_is_isolated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bending_data.txt");
        fs::write(&path, "16,90,5\n16,10").unwrap();

        let mut log = FileLog::new(&path);
        log.append(&Sample::new(gauge(16), 100.0, 6.0)).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "16,90,5\n16,10\n16,100,6\n"
        );
        let contents = log.read_all().unwrap();
        let bad: Vec<_> = contents.records().filter_map(Result::err).collect();
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].line, "16,10");
    }

    #[test]
    fn test_failed_append_is_rolled_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bending_data.txt");
        fs::write(&path, "16,90,5\n").unwrap();

        let mut file = OpenOptions::new().read(true).append(true).open(&path).unwrap();
        let result = rollback_on_error(&mut file, 8, |file| {
            file.write_all(b"16,100,6\n")?;
            Err(io::Error::other("sync failed"))
        });
        drop(file);

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "16,90,5\n");

        let (registry, report) = CalibrationRegistry::open(FileLog::new(&path)).unwrap();
        assert_eq!(report.records, 1);
        assert_eq!(registry.fit_for(gauge(16)), None);
    }

    #[test]
    fn test_unwritable_location_is_storage_error() {
        let dir = tempdir().unwrap();
        let mut log = FileLog::new(dir.path().join("missing").join("bending_data.txt"));

        let err = log.append(&Sample::new(gauge(16), 90.0, 5.0)).unwrap_err();
        assert!(matches!(err, StorageError::Append(_)));
    }

    #[test]
    fn test_observations_survive_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bending_data.txt");

        {
            let mut registry = CalibrationRegistry::new(FileLog::new(&path));
            registry.record_observation(gauge(20), 90.0, 5.3).unwrap();
            registry.record_observation(gauge(20), 120.0, 6.5).unwrap();
        }

        let (registry, report) = CalibrationRegistry::open(FileLog::new(&path)).unwrap();
        assert_eq!(report.records, 2);
        let slope = registry.fit_for(gauge(20)).unwrap();
        assert!((slope - 0.04).abs() < 1e-9);
    }
}
