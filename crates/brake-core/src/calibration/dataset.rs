use alloc::vec::Vec;

use super::NOMINAL_ANGLE_DEG;
use crate::sample::Point;

/// All samples observed for one gauge, plus its reference point.
///
/// The dataset only grows. The reference point is replaced only when a new
/// sample is *strictly* closer to the nominal angle than the current one, so
/// on a tie the earlier sample stays the reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GaugeDataset {
    points: Vec<Point>,
    reference: Option<Point>,
}

impl GaugeDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample and re-evaluate the reference point.
    pub fn add_sample(&mut self, angle: f64, offset: f64) {
        let point = Point::new(angle, offset);
        self.points.push(point);

        let closer = match self.reference {
            None => true,
            Some(current) => distance_from_nominal(angle) < distance_from_nominal(current.angle),
        };
        if closer {
            self.reference = Some(point);
        }
    }

    pub fn sample_count(&self) -> usize {
        self.points.len()
    }

    /// Samples in the order they were added
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// `None` until the first sample arrives
    pub fn reference_point(&self) -> Option<Point> {
        self.reference
    }
}

fn distance_from_nominal(angle: f64) -> f64 {
    (NOMINAL_ANGLE_DEG - angle).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset_has_no_reference() {
        let dataset = GaugeDataset::new();
        assert_eq!(dataset.sample_count(), 0);
        assert_eq!(dataset.reference_point(), None);
    }

    #[test]
    fn test_first_sample_becomes_reference() {
        let mut dataset = GaugeDataset::new();
        dataset.add_sample(135.0, 3.2);
        assert_eq!(dataset.reference_point(), Some(Point::new(135.0, 3.2)));
    }

    #[test]
    fn test_reference_tracks_closest_to_nominal() {
        let mut dataset = GaugeDataset::new();
        dataset.add_sample(80.0, 4.0);
        dataset.add_sample(95.0, 5.5);
        assert_eq!(dataset.reference_point(), Some(Point::new(95.0, 5.5)));

        dataset.add_sample(120.0, 7.0);
        assert_eq!(dataset.reference_point(), Some(Point::new(95.0, 5.5)));
        assert_eq!(dataset.sample_count(), 3);
    }

    #[test]
    fn test_tie_keeps_incumbent_reference() {
        // Distances from 90: 10, 5, 1, 1. The 89 sample ties 91 and does not replace it.
        let mut dataset = GaugeDataset::new();
        for (angle, offset) in [(80.0, 4.0), (95.0, 5.5), (91.0, 5.1), (89.0, 4.9)] {
            dataset.add_sample(angle, offset);
        }

        assert_eq!(dataset.reference_point(), Some(Point::new(91.0, 5.1)));
    }

    #[test]
    fn test_points_keep_insertion_order() {
        let mut dataset = GaugeDataset::new();
        dataset.add_sample(100.0, 6.0);
        dataset.add_sample(90.0, 5.0);

        let angles: Vec<f64> = dataset.points().iter().map(|p| p.angle).collect();
        assert_eq!(angles, [100.0, 90.0]);
    }
}
