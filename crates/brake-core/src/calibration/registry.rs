use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use log::{debug, error, info, warn};
use thiserror_no_std::Error;

use super::MIN_FIT_SAMPLES;
use super::dataset::GaugeDataset;
use super::regression::{FitResult, least_squares_slope};
use crate::sample::{Gauge, MalformedRecordError, Point, Sample};
use crate::storage::{SampleLog, StorageError};

/// Dataset and current slope for one gauge
#[derive(Debug, Clone, Default, PartialEq)]
struct GaugeState {
    dataset: GaugeDataset,
    slope: Option<f64>,
}

impl GaugeState {
    /// Refit from the full dataset, keeping the previous slope if the refit fails.
    fn refit(&mut self) -> FitResult {
        let fit = least_squares_slope(self.dataset.points());
        if let Ok(slope) = fit {
            self.slope = Some(slope);
        }
        fit
    }
}

/// Outcome of a cold rebuild from the sample log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebuildReport {
    /// Records folded into datasets
    pub records: usize,
    /// Lines that could not be parsed and were skipped
    pub skipped: Vec<MalformedRecordError>,
    /// Gauges with at least one sample
    pub gauges: usize,
    /// Gauges that ended up with a usable slope
    pub fitted: usize,
}

/// Why an observation was not recorded
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("angle {angle} and offset {offset} must both be finite")]
    NonFinite { angle: f64, offset: f64 },
    #[error("{0}")]
    Storage(StorageError),
}

impl From<StorageError> for RecordError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

/// Read-only view of one gauge's calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeSummary {
    pub gauge: Gauge,
    pub samples: usize,
    pub slope: Option<f64>,
    pub reference: Option<Point>,
}

/// Owns the sample log and every gauge's dataset and fitted slope.
///
/// All mutation goes through [`rebuild_from_store`](Self::rebuild_from_store)
/// and [`record_observation`](Self::record_observation); neither leaves a
/// gauge half-updated. Callers that share a registry across threads must
/// serialise those two behind a lock.
pub struct CalibrationRegistry<L> {
    log: L,
    gauges: BTreeMap<Gauge, GaugeState>,
}

impl<L: SampleLog> CalibrationRegistry<L> {
    /// Create an empty registry over `log` without reading it.
    pub fn new(log: L) -> Self {
        Self {
            log,
            gauges: BTreeMap::new(),
        }
    }

    /// Create a registry and cold-rebuild it from `log`.
    pub fn open(log: L) -> Result<(Self, RebuildReport), StorageError> {
        let mut registry = Self::new(log);
        let report = registry.rebuild_from_store()?;
        Ok((registry, report))
    }

    /// Discard in-memory state and replay the whole log in write order.
    ///
    /// Malformed lines are skipped, logged, and returned in the report; they
    /// never abort the rebuild. If the log cannot be read at all the current
    /// state is kept.
    pub fn rebuild_from_store(&mut self) -> Result<RebuildReport, StorageError> {
        let contents = self.log.read_all()?;

        let mut gauges: BTreeMap<Gauge, GaugeState> = BTreeMap::new();
        let mut report = RebuildReport::default();

        for record in contents.records() {
            match record {
                Ok(sample) => {
                    gauges
                        .entry(sample.gauge)
                        .or_default()
                        .dataset
                        .add_sample(sample.point.angle, sample.point.offset);
                    report.records += 1;
                }
                Err(e) => {
                    warn!("Skipping {}", e);
                    report.skipped.push(e);
                }
            }
        }

        for (gauge, state) in gauges.iter_mut() {
            if state.dataset.sample_count() < MIN_FIT_SAMPLES {
                continue;
            }
            match state.refit() {
                Ok(slope) => {
                    debug!(
                        "Gauge {}: slope {} over {} samples",
                        gauge,
                        slope,
                        state.dataset.sample_count()
                    );
                    report.fitted += 1;
                }
                Err(e) => warn!("Gauge {}: no fit, {}", gauge, e),
            }
        }

        report.gauges = gauges.len();
        self.gauges = gauges;

        info!(
            "Rebuilt calibration from {} records ({} skipped): {} gauges, {} fitted",
            report.records,
            report.skipped.len(),
            report.gauges,
            report.fitted
        );

        Ok(report)
    }

    /// Persist one observation, fold it into its gauge and refit that gauge.
    ///
    /// The log append happens first; if it fails nothing in memory changes.
    /// Non-finite values are refused before anything is written, since the
    /// log could not read them back. On success the returned [`FitResult`]
    /// describes the refit. A failed refit leaves the gauge's previous slope
    /// in place.
    pub fn record_observation(
        &mut self,
        gauge: Gauge,
        angle: f64,
        offset: f64,
    ) -> Result<FitResult, RecordError> {
        if !(angle.is_finite() && offset.is_finite()) {
            warn!("Gauge {}: refusing non-finite observation", gauge);
            return Err(RecordError::NonFinite { angle, offset });
        }

        let sample = Sample::new(gauge, angle, offset);
        if let Err(e) = self.log.append(&sample) {
            error!("Failed to log observation {}: {}", sample, e);
            return Err(e.into());
        }

        let state = self.gauges.entry(gauge).or_default();
        state.dataset.add_sample(angle, offset);
        let fit = state.refit();

        match fit {
            Ok(slope) => debug!("Gauge {}: refit slope {}", gauge, slope),
            Err(e) => debug!("Gauge {}: slope unchanged, {}", gauge, e),
        }

        Ok(fit)
    }

    /// Borrow the underlying sample log
    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn into_log(self) -> L {
        self.log
    }
}

impl<L> CalibrationRegistry<L> {
    /// Current slope for `gauge`, if it has one
    pub fn fit_for(&self, gauge: Gauge) -> Option<f64> {
        self.gauges.get(&gauge).and_then(|state| state.slope)
    }

    /// Current reference point for `gauge`, if it has any samples
    pub fn reference_point_for(&self, gauge: Gauge) -> Option<Point> {
        self.gauges
            .get(&gauge)
            .and_then(|state| state.dataset.reference_point())
    }

    pub fn dataset(&self, gauge: Gauge) -> Option<&GaugeDataset> {
        self.gauges.get(&gauge).map(|state| &state.dataset)
    }

    /// Known gauges in ascending order
    pub fn gauges(&self) -> impl Iterator<Item = Gauge> + '_ {
        self.gauges.keys().copied()
    }

    pub fn summaries(&self) -> impl Iterator<Item = GaugeSummary> + '_ {
        self.gauges.iter().map(|(&gauge, state)| GaugeSummary {
            gauge,
            samples: state.dataset.sample_count(),
            slope: state.slope,
            reference: state.dataset.reference_point(),
        })
    }
}
