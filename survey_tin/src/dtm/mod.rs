//! Triangulated Irregular Network (TIN) surfaces built from survey points.
//!
//! A [`TinSurface`] is built once from scattered `(x, y, z)` samples and is
//! read-only afterwards. Contours are extracted with [`extract_contours`] and
//! point queries are answered by [`interpolate_elevation`] and [`slope_at`].
//! Point location is a linear scan over the triangles.

mod contour;
mod query;
mod surface;
mod triangulation;
mod validate;

pub use contour::{
    auto_interval, contour_elevations, extract_contours, Contour, ContourOptions, ContourSet,
    ElevationRange,
};
pub use query::{interpolate_elevation, locate_triangle, slope_at, CompassDirection, SlopeResult};
pub use surface::{Bounds, Statistics, TinSurface, Triangle};
pub use triangulation::{CdtTriangulator, DelaunatorTriangulator, Triangulator};
pub use validate::validate_points;

/// Absolute tolerance shared by crossing rejection, endpoint matching,
/// barycentric containment and degenerate facet detection.
///
/// Values that land exactly on the tolerance may fall either way.
pub const EPSILON: f64 = 1e-4;
