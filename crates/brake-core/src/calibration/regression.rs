use thiserror_no_std::Error;

use super::MIN_FIT_SAMPLES;
use crate::sample::Point;

/// Why a gauge has no usable slope.
///
/// Both variants are ordinary states for sparse or badly spread data, not
/// faults. A failed refit never replaces an existing slope.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitError {
    #[error("need at least 2 samples to fit a slope, have {samples}")]
    InsufficientData { samples: usize },
    #[error("samples do not span more than one angle")]
    Degenerate,
}

pub type FitResult = Result<f64, FitError>;

/// Running sums for the closed-form least-squares slope.
#[derive(Debug, Clone, Copy, Default)]
struct Sums {
    n: usize,
    x: f64,
    x2: f64,
    y: f64,
    xy: f64,
    /// Whether any sample's angle differs from the first one
    spread: bool,
    first_x: f64,
}

impl Sums {
    fn push(&mut self, point: &Point) {
        if self.n == 0 {
            self.first_x = point.angle;
        } else if point.angle != self.first_x {
            self.spread = true;
        }

        self.n += 1;
        self.x += point.angle;
        self.x2 += point.angle * point.angle;
        self.y += point.offset;
        self.xy += point.angle * point.offset;
    }

    fn slope(&self) -> FitResult {
        if !self.spread {
            return Err(FitError::Degenerate);
        }

        let n = self.n as f64;
        let numerator = n * self.xy - self.x * self.y;
        let denominator = n * self.x2 - self.x * self.x;
        let slope = numerator / denominator;

        if slope.is_finite() {
            Ok(slope)
        } else {
            Err(FitError::Degenerate)
        }
    }
}

/// Ordinary least-squares slope of offset against angle.
///
/// Recomputed from scratch over every point:
///
/// ```text
/// slope = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
/// ```
///
/// Fewer than two points is [`FitError::InsufficientData`]. Identical angles,
/// or sums that overflow to a non-finite slope, are [`FitError::Degenerate`].
pub fn least_squares_slope(points: &[Point]) -> FitResult {
    if points.len() < MIN_FIT_SAMPLES {
        return Err(FitError::InsufficientData {
            samples: points.len(),
        });
    }

    let mut sums = Sums::default();
    for point in points {
        sums.push(point);
    }
    sums.slope()
}
