//! Entry points for the operator UI.
//!
//! The UI hands over raw field text; this layer validates it, drives the
//! [`CalibrationRegistry`], and turns predictions back into display text.
//! Every failure comes back as a value the UI can show or ignore.

use alloc::format;
use alloc::string::String;

use log::{debug, info};
use thiserror_no_std::Error;

use crate::calibration::{CalibrationRegistry, PredictError, RebuildReport, RecordError};
use crate::config::CalculatorConfig;
use crate::input::{Field, ValidationError, parse_decimal};
use crate::sample::Gauge;
use crate::storage::{SampleLog, StorageError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObservationError {
    #[error("invalid {field}: {error}")]
    Validation { field: Field, error: ValidationError },
    #[error("observation not recorded: {0}")]
    NotRecorded(RecordError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("invalid {field}: {error}")]
    Validation { field: Field, error: ValidationError },
    #[error("no prediction available: {0}")]
    Unavailable(PredictError),
}

impl From<RecordError> for ObservationError {
    fn from(error: RecordError) -> Self {
        Self::NotRecorded(error)
    }
}

impl From<PredictError> for PredictionError {
    fn from(error: PredictError) -> Self {
        Self::Unavailable(error)
    }
}

fn checked_gauge(gauge: u32) -> Result<Gauge, ValidationError> {
    Gauge::new(gauge).ok_or(ValidationError::InvalidGauge)
}

/// Calibration registry plus the display settings the UI needs.
pub struct BendCalculator<L> {
    registry: CalibrationRegistry<L>,
    display_decimals: usize,
}

impl<L: SampleLog> BendCalculator<L> {
    /// Cold-start the calculator from the sample log.
    pub fn on_startup(
        log: L,
        config: &CalculatorConfig,
    ) -> Result<(Self, RebuildReport), StorageError> {
        let (registry, report) = CalibrationRegistry::open(log)?;
        info!(
            "Calculator ready, {} of {} gauges calibrated",
            report.fitted, report.gauges
        );

        let calculator = Self {
            registry,
            display_decimals: config.display_decimals,
        };
        Ok((calculator, report))
    }

    /// Record a measured (angle, BND offset) pair for `gauge`.
    ///
    /// Nothing is written or changed unless every field validates.
    pub fn on_observation_entered(
        &mut self,
        gauge: u32,
        angle_text: &str,
        offset_text: &str,
    ) -> Result<(), ObservationError> {
        let gauge = checked_gauge(gauge).map_err(|error| ObservationError::Validation {
            field: Field::Gauge,
            error,
        })?;
        let angle = parse_decimal(angle_text).map_err(|error| ObservationError::Validation {
            field: Field::Angle,
            error,
        })?;
        let offset = parse_decimal(offset_text).map_err(|error| ObservationError::Validation {
            field: Field::Offset,
            error,
        })?;

        let fit = self.registry.record_observation(gauge, angle, offset)?;
        debug!("Gauge {} observation recorded, fit: {:?}", gauge, fit);
        Ok(())
    }
}

impl<L> BendCalculator<L> {
    /// Predicted BND offset text for the currently entered gauge and angle.
    pub fn on_angle_or_gauge_changed(
        &self,
        gauge: u32,
        angle_text: &str,
    ) -> Result<String, PredictionError> {
        let gauge = checked_gauge(gauge).map_err(|error| PredictionError::Validation {
            field: Field::Gauge,
            error,
        })?;
        let angle = parse_decimal(angle_text).map_err(|error| PredictionError::Validation {
            field: Field::Angle,
            error,
        })?;

        let offset = self.registry.predict(gauge, angle)?;
        Ok(format!("{:.*}", self.display_decimals, offset))
    }

    pub fn registry(&self) -> &CalibrationRegistry<L> {
        &self.registry
    }

    pub fn display_decimals(&self) -> usize {
        self.display_decimals
    }
}
