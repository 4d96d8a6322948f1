//! Validation of operator-entered numeric text.
//!
//! A numeric field is accepted iff it is non-empty, is not a lone `.`, and
//! consists only of ASCII digits with at most one decimal point. Signs,
//! exponents and whitespace are all rejected.

use core::fmt::{self, Display};

use thiserror_no_std::Error;

use crate::sample::Gauge;

const DECIMAL_POINT: char = '.';

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field is empty")]
    Empty,
    #[error("field holds only a decimal point")]
    LoneDecimalPoint,
    #[error("unexpected character {ch:?}")]
    InvalidCharacter { ch: char },
    #[error("more than one decimal point")]
    MultipleDecimalPoints,
    #[error("gauge must be a positive whole number")]
    InvalidGauge,
    #[error("value is too large")]
    OutOfRange,
}

/// Which field of an entry form a validation failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Gauge,
    Angle,
    Offset,
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gauge => "gauge",
            Self::Angle => "angle",
            Self::Offset => "offset",
        })
    }
}

/// Check `text` against the shared numeric field rule.
pub fn validate_numeric(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::Empty);
    }
    if text == "." {
        return Err(ValidationError::LoneDecimalPoint);
    }

    let mut decimal_points = 0;
    for ch in text.chars() {
        match ch {
            '0'..='9' => {}
            DECIMAL_POINT => {
                decimal_points += 1;
                if decimal_points > 1 {
                    return Err(ValidationError::MultipleDecimalPoints);
                }
            }
            other => return Err(ValidationError::InvalidCharacter { ch: other }),
        }
    }

    Ok(())
}

/// Validate and convert a decimal field such as an angle or BND offset.
///
/// Digit strings too long for an `f64` are rejected rather than becoming
/// infinity.
pub fn parse_decimal(text: &str) -> Result<f64, ValidationError> {
    validate_numeric(text)?;
    // Anything that passed validation ("5", "5.", ".5", "05.250") parses.
    let value = text
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidCharacter { ch: DECIMAL_POINT })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange)
    }
}

/// Validate and convert a gauge field.
pub fn parse_gauge(text: &str) -> Result<Gauge, ValidationError> {
    validate_numeric(text)?;
    text.parse::<u32>()
        .ok()
        .and_then(Gauge::new)
        .ok_or(ValidationError::InvalidGauge)
}
