//! Magnitude-threshold motion classifier.

use scanbuddy_core::{MotionSample, TrackerConfig};

/// Classification of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Deviation from rest strictly below the threshold
    Still,
    /// Deviation at or above the threshold, or an unreadable sample
    Moving,
}

impl Motion {
    /// Whether this is [`Motion::Still`].
    pub fn is_still(self) -> bool {
        matches!(self, Motion::Still)
    }
}

/// Classifies samples by how far their magnitude strays from rest gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionClassifier {
    threshold: f64,
    rest_magnitude: f64,
}

impl MotionClassifier {
    /// Create a classifier.
    pub fn new(threshold: f64, rest_magnitude: f64) -> Self {
        Self {
            threshold,
            rest_magnitude,
        }
    }

    /// Create a classifier from a tracker config.
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.movement_threshold, config.rest_magnitude)
    }

    /// Signed deviation of the sample's norm from rest, or `None` if the
    /// sample is not finite.
    pub fn deviation(&self, sample: &MotionSample) -> Option<f64> {
        if !sample.is_finite() {
            return None;
        }
        let deviation = sample.norm() - self.rest_magnitude;
        deviation.is_finite().then_some(deviation)
    }

    /// Classify a sample. Non-finite samples are moving.
    pub fn classify(&self, sample: &MotionSample) -> Motion {
        match self.deviation(sample) {
            Some(deviation) if deviation.abs() < self.threshold => Motion::Still,
            _ => Motion::Moving,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanbuddy_core::STANDARD_GRAVITY;

    #[test]
    fn test_rest_is_still() {
        let classifier = MotionClassifier::new(0.7, STANDARD_GRAVITY);
        assert_eq!(classifier.classify(&MotionSample::at_rest(STANDARD_GRAVITY)), Motion::Still);
    }

    #[test]
    fn test_shake_is_moving() {
        let classifier = MotionClassifier::new(0.7, STANDARD_GRAVITY);
        assert_eq!(classifier.classify(&MotionSample::new(2.0, 1.0, 11.0)), Motion::Moving);
    }

    #[test]
    fn test_free_fall_is_moving() {
        // Magnitude far below rest counts as movement too.
        let classifier = MotionClassifier::new(0.7, STANDARD_GRAVITY);
        assert_eq!(classifier.classify(&MotionSample::new(0.0, 0.0, 0.0)), Motion::Moving);
    }

    #[test]
    fn test_threshold_boundary_is_moving() {
        let classifier = MotionClassifier::new(0.5, 1.0);
        assert_eq!(classifier.deviation(&MotionSample::new(0.0, 0.0, 1.5)), Some(0.5));
        assert_eq!(classifier.classify(&MotionSample::new(0.0, 0.0, 1.5)), Motion::Moving);
        assert_eq!(classifier.classify(&MotionSample::new(0.0, 0.0, 0.5)), Motion::Moving);
        assert_eq!(classifier.classify(&MotionSample::new(0.0, 0.0, 1.25)), Motion::Still);
    }

    #[test]
    fn test_non_finite_is_moving() {
        let classifier = MotionClassifier::new(0.7, STANDARD_GRAVITY);
        assert_eq!(classifier.deviation(&MotionSample::new(f64::NAN, 0.0, 9.81)), None);
        assert_eq!(classifier.classify(&MotionSample::new(f64::NAN, 0.0, 9.81)), Motion::Moving);
        assert_eq!(
            classifier.classify(&MotionSample::new(0.0, f64::INFINITY, 0.0)),
            Motion::Moving
        );
    }

    #[test]
    fn test_overflowing_norm_is_moving() {
        let classifier = MotionClassifier::new(0.7, STANDARD_GRAVITY);
        assert_eq!(
            classifier.classify(&MotionSample::new(f64::MAX, f64::MAX, 0.0)),
            Motion::Moving
        );
    }

    #[test]
    fn test_normalised_units() {
        let classifier = MotionClassifier::from_config(
            &TrackerConfig::new(15.0, 0.07).with_rest_magnitude(1.0),
        );
        assert!(classifier.classify(&MotionSample::new(0.0, 0.02, 1.01)).is_still());
        assert!(!classifier.classify(&MotionSample::new(0.0, 0.0, 1.2)).is_still());
    }
}
