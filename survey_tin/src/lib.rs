//! Core library for building terrain surfaces from survey points.
//!
//! Survey samples are triangulated into a [`dtm::TinSurface`], from which
//! contour lines, interpolated elevations and slope/aspect are derived.

pub mod dtm;
pub mod error;
pub mod geometry;

pub use dtm::{ContourOptions, ContourSet, SlopeResult, TinSurface};
pub use error::TinError;
pub use geometry::{Point, SurveyPoint};
