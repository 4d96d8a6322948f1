use thiserror_no_std::Error;

use super::registry::CalibrationRegistry;
use crate::sample::{Gauge, Point};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictError {
    #[error("gauge {gauge} is not calibrated yet")]
    NotCalibrated { gauge: Gauge },
    #[error("predicted offset for gauge {gauge} is out of range")]
    OutOfRange { gauge: Gauge },
}

/// Straight line through a gauge's reference point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub slope: f64,
    pub reference: Point,
}

impl LinearModel {
    /// Predicted BND offset for a target bend angle
    pub fn offset_at(&self, angle: f64) -> f64 {
        self.reference.offset + self.slope * (angle - self.reference.angle)
    }
}

impl<L> CalibrationRegistry<L> {
    /// The gauge's fitted line, available once it has both a slope and a
    /// reference point.
    pub fn model_for(&self, gauge: Gauge) -> Option<LinearModel> {
        let slope = self.fit_for(gauge)?;
        let reference = self.reference_point_for(gauge)?;
        Some(LinearModel { slope, reference })
    }

    /// Predict the BND offset that will produce `angle` on `gauge`.
    pub fn predict(&self, gauge: Gauge, angle: f64) -> Result<f64, PredictError> {
        let model = self
            .model_for(gauge)
            .ok_or(PredictError::NotCalibrated { gauge })?;
        let offset = model.offset_at(angle);
        if offset.is_finite() {
            Ok(offset)
        } else {
            Err(PredictError::OutOfRange { gauge })
        }
    }
}
