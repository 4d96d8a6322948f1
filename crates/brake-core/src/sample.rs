//! Observation records and their line-oriented log format.
//!
//! One record per line, no header, no escaping:
//!
//! ```text
//! <gauge:int>,<angle:decimal>,<offset:decimal>
//! ```
//!
//! Angles and offsets are written with Rust's shortest round-trip float
//! formatting, so a value read back is bit-identical to the one logged.

use alloc::string::String;
use core::fmt::{self, Display, Write};
use core::num::NonZeroU32;

use thiserror_no_std::Error;

/// Field separator used by the log format
pub const FIELD_SEPARATOR: char = ',';

/// Number of fields in a record
pub const RECORD_FIELDS: usize = 3;

/// Material thickness category.
///
/// Any positive integer is a valid gauge as far as the engine is concerned;
/// restricting entry to the shop's gauges is the UI's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gauge(NonZeroU32);

impl Gauge {
    /// Returns `None` for gauge 0.
    pub const fn new(id: u32) -> Option<Self> {
        match NonZeroU32::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Display for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// An (angle, BND offset) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Bend angle in degrees
    pub angle: f64,
    /// Machine calibration offset (BND point)
    pub offset: f64,
}

impl Point {
    pub const fn new(angle: f64, offset: f64) -> Self {
        Self { angle, offset }
    }
}

/// One logged observation. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub gauge: Gauge,
    pub point: Point,
}

impl Sample {
    pub const fn new(gauge: Gauge, angle: f64, offset: f64) -> Self {
        Self {
            gauge,
            point: Point::new(angle, offset),
        }
    }

    /// Write this sample as a log record, without the trailing newline.
    pub fn write_record<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(
            out,
            "{}{sep}{}{sep}{}",
            self.gauge,
            self.point.angle,
            self.point.offset,
            sep = FIELD_SEPARATOR
        )
    }

    /// Parse one non-blank log line.
    ///
    /// `line_number` is 1-based and only used for error reporting.
    pub fn parse_record(line: &str, line_number: usize) -> Result<Self, MalformedRecordError> {
        let malformed = |fault: RecordFault| MalformedRecordError {
            line_number,
            line: String::from(line),
            fault,
        };

        let mut fields = line.split(FIELD_SEPARATOR).map(str::trim);
        let (Some(gauge), Some(angle), Some(offset), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            let found = line.split(FIELD_SEPARATOR).count();
            return Err(malformed(RecordFault::FieldCount(found)));
        };

        let gauge = gauge
            .parse::<u32>()
            .ok()
            .and_then(Gauge::new)
            .ok_or_else(|| malformed(RecordFault::Gauge))?;
        let angle = parse_finite(angle).ok_or_else(|| malformed(RecordFault::Angle))?;
        let offset = parse_finite(offset).ok_or_else(|| malformed(RecordFault::Offset))?;

        Ok(Self::new(gauge, angle, offset))
    }
}

impl Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_record(f)
    }
}

fn parse_finite(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Which part of a record failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFault {
    /// Wrong number of comma-separated fields (holds the count found)
    FieldCount(usize),
    /// Gauge is not a positive integer
    Gauge,
    /// Angle is not a finite decimal
    Angle,
    /// Offset is not a finite decimal
    Offset,
}

impl Display for RecordFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount(found) => {
                write!(f, "expected {} fields, found {}", RECORD_FIELDS, found)
            }
            Self::Gauge => f.write_str("gauge is not a positive integer"),
            Self::Angle => f.write_str("angle is not a number"),
            Self::Offset => f.write_str("offset is not a number"),
        }
    }
}

/// A persisted line that could not be turned into a [`Sample`]
#[derive(Error, Debug, Clone, PartialEq)]
#[error("malformed record on line {line_number} ({fault}): {line:?}")]
pub struct MalformedRecordError {
    pub line_number: usize,
    pub line: String,
    pub fault: RecordFault,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn gauge(id: u32) -> Gauge {
        Gauge::new(id).unwrap()
    }

    #[test]
    fn test_gauge_rejects_zero() {
        assert!(Gauge::new(0).is_none());
        assert_eq!(gauge(16).get(), 16);
    }

    #[test]
    fn test_record_keeps_full_precision() {
        let sample = Sample::new(gauge(18), 91.25, 5.9612345678);
        let line = sample.to_string();

        assert_eq!(line, "18,91.25,5.9612345678");
        assert_eq!(Sample::parse_record(&line, 1).unwrap(), sample);
    }

    #[test]
    fn test_whole_numbers_written_without_fraction() {
        let sample = Sample::new(gauge(16), 90.0, 5.0);
        assert_eq!(sample.to_string(), "16,90,5");
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let sample = Sample::parse_record(" 20 , 45.5 ,6.1", 3).unwrap();
        assert_eq!(sample.gauge, gauge(20));
        assert_eq!(sample.point, Point::new(45.5, 6.1));
    }

    #[test]
    fn test_parse_wrong_field_count() {
        let err = Sample::parse_record("abc,def", 7).unwrap_err();
        assert_eq!(err.line_number, 7);
        assert_eq!(err.line, "abc,def");
        assert_eq!(err.fault, RecordFault::FieldCount(2));

        let err = Sample::parse_record("16,90,5,1", 1).unwrap_err();
        assert_eq!(err.fault, RecordFault::FieldCount(4));
    }

    #[test]
    fn test_parse_identifies_bad_field() {
        assert_eq!(
            Sample::parse_record("0,90,5", 1).unwrap_err().fault,
            RecordFault::Gauge
        );
        assert_eq!(
            Sample::parse_record("16.5,90,5", 1).unwrap_err().fault,
            RecordFault::Gauge
        );
        assert_eq!(
            Sample::parse_record("16,ninety,5", 1).unwrap_err().fault,
            RecordFault::Angle
        );
        assert_eq!(
            Sample::parse_record("16,90,inf", 1).unwrap_err().fault,
            RecordFault::Offset
        );
    }

    #[test]
    fn test_malformed_error_names_the_line() {
        let err = Sample::parse_record("abc,def", 2).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 2"));
        assert!(message.contains("abc,def"));
    }
}
