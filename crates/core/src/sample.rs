//! Motion sample model - one raw accelerometer reading.

use serde::{Deserialize, Serialize};

/// Gravity reading of a device at rest, in raw sensor units (m/s²).
pub const STANDARD_GRAVITY: f64 = 9.81;

/// A single 3-axis acceleration reading.
///
/// Samples are transient: the tracker classifies each one on arrival and
/// keeps only the resulting still/moving flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    /// X axis acceleration
    pub x: f64,
    /// Y axis acceleration
    pub y: f64,
    /// Z axis acceleration
    pub z: f64,
}

impl MotionSample {
    /// Create a new sample.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A device lying flat and motionless under the given gravity.
    pub fn at_rest(gravity: f64) -> Self {
        Self::new(0.0, 0.0, gravity)
    }

    /// Euclidean norm of the three axes.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Whether every axis is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm() {
        let sample = MotionSample::new(3.0, 4.0, 12.0);
        assert!((sample.norm() - 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_at_rest_norm_equals_gravity() {
        let sample = MotionSample::at_rest(STANDARD_GRAVITY);
        assert!((sample.norm() - STANDARD_GRAVITY).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_detection() {
        assert!(MotionSample::new(0.0, 0.0, 9.81).is_finite());
        assert!(!MotionSample::new(f64::NAN, 0.0, 9.81).is_finite());
        assert!(!MotionSample::new(0.0, f64::INFINITY, 9.81).is_finite());
        assert!(!MotionSample::new(0.0, 0.0, f64::NEG_INFINITY).is_finite());
    }

    #[test]
    fn test_deserialize_from_json_line() {
        let sample: MotionSample = serde_json::from_str(r#"{"x":0.1,"y":-0.2,"z":9.7}"#).unwrap();
        assert_eq!(sample, MotionSample::new(0.1, -0.2, 9.7));
    }
}
