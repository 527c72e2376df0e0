//! Surveyed 3D point type used throughout the crate.

use super::Point;

/// Surveyed sample with planar coordinates and an elevation `z`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurveyPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SurveyPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns `true` when all three components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Projection onto the XY plane.
    pub fn xy(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<(f64, f64, f64)> for SurveyPoint {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[f64; 3]> for SurveyPoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}
