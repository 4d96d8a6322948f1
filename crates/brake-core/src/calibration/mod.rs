//! Per-gauge calibration engine.
//!
//! Each gauge accumulates (angle, offset) samples in a [`GaugeDataset`]. Once a
//! gauge has two samples at different angles, a least-squares slope of offset
//! against angle is fitted. Predictions anchor that slope at the gauge's
//! reference point, the sample closest to [`NOMINAL_ANGLE_DEG`]:
//!
//! ```text
//! offset(angle) = reference.offset + slope * (angle - reference.angle)
//! ```
//!
//! ## Lifecycle
//!
//! - **Cold start**: [`CalibrationRegistry::rebuild_from_store`] replays the
//!   whole sample log and fits every gauge once.
//! - **Steady state**: [`CalibrationRegistry::record_observation`] appends to
//!   the log, folds the sample into its gauge and refits that gauge only.

mod dataset;
mod predictor;
mod regression;
mod registry;

pub use dataset::GaugeDataset;
pub use predictor::{LinearModel, PredictError};
pub use regression::{FitError, FitResult, least_squares_slope};
pub use registry::{CalibrationRegistry, GaugeSummary, RebuildReport, RecordError};

/// Bend angle the reference point is chosen closest to (degrees)
pub const NOMINAL_ANGLE_DEG: f64 = 90.0;

/// Fewest samples a slope can be fitted from
pub const MIN_FIT_SAMPLES: usize = 2;
