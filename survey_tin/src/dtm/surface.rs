use serde::{Deserialize, Serialize};

use super::contour::{extract_contours, ContourOptions, ContourSet};
use super::query::{interpolate_elevation, locate_triangle, slope_at, SlopeResult};
use super::triangulation::{triangulate_points, DelaunatorTriangulator, Triangulator};
use super::validate::validate_points;
use super::EPSILON;
use crate::error::TinError;
use crate::geometry::{cross, norm, polygon_area, subtract, SurveyPoint};

/// Single facet of a [`TinSurface`].
///
/// The vertices are copies of the owning surface's points so consumers never
/// need to look up `indices` themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// Position of the triangle in construction order.
    pub id: usize,
    /// Indices into [`TinSurface::points`].
    pub indices: [usize; 3],
    pub vertices: [SurveyPoint; 3],
}

impl Triangle {
    pub fn new(id: usize, indices: [usize; 3], vertices: [SurveyPoint; 3]) -> Self {
        Self {
            id,
            indices,
            vertices,
        }
    }

    /// Area of the triangle projected onto the XY plane.
    pub fn projected_area(&self) -> f64 {
        let [a, b, c] = self.vertices;
        polygon_area(&[a.xy(), b.xy(), c.xy()])
    }

    pub fn centroid(&self) -> SurveyPoint {
        let [a, b, c] = self.vertices;
        SurveyPoint::new(
            (a.x + b.x + c.x) / 3.0,
            (a.y + b.y + c.y) / 3.0,
            (a.z + b.z + c.z) / 3.0,
        )
    }

    /// Plane normal from the cross product of the edges leaving the first
    /// vertex. Its length is twice the 3D area of the facet.
    pub fn normal(&self) -> SurveyPoint {
        let [a, b, c] = self.vertices;
        cross(subtract(b, a), subtract(c, a))
    }

    /// Unit plane normal, or `None` when the facet has (near) zero area.
    pub fn unit_normal(&self) -> Option<SurveyPoint> {
        let n = self.normal();
        let len = norm(n);
        if len < EPSILON {
            return None;
        }
        Some(SurveyPoint::new(n.x / len, n.y / len, n.z / len))
    }

    /// Lowest and highest vertex elevation.
    pub fn z_range(&self) -> (f64, f64) {
        let [a, b, c] = self.vertices;
        (a.z.min(b.z).min(c.z), a.z.max(b.z).max(c.z))
    }
}

/// Axis aligned extent of the surface points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds {
    fn from_points(points: &[SurveyPoint]) -> Self {
        points.iter().fold(
            Self {
                min_x: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                min_y: f64::INFINITY,
                max_y: f64::NEG_INFINITY,
                min_z: f64::INFINITY,
                max_z: f64::NEG_INFINITY,
            },
            |b, p| Self {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
                min_z: b.min_z.min(p.z),
                max_z: b.max_z.max(p.z),
            },
        )
    }

    /// Returns `true` if `(x, y)` lies inside the planar extent.
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Elevation summary of the surface points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub avg_elevation: f64,
    pub elevation_range: f64,
}

impl Statistics {
    fn from_points(points: &[SurveyPoint]) -> Self {
        let min = points.iter().map(|p| p.z).fold(f64::INFINITY, f64::min);
        let max = points.iter().map(|p| p.z).fold(f64::NEG_INFINITY, f64::max);
        let avg = points.iter().map(|p| p.z).sum::<f64>() / points.len() as f64;
        Self {
            min_elevation: min,
            max_elevation: max,
            avg_elevation: avg,
            elevation_range: max - min,
        }
    }
}

/// Triangulated Irregular Network built from survey points.
///
/// The surface is created in one batch by [`TinSurface::build`] and cannot be
/// modified afterwards, so it can be shared freely between threads.
#[derive(Debug, Clone, Serialize)]
pub struct TinSurface {
    points: Vec<SurveyPoint>,
    triangles: Vec<Triangle>,
    bounds: Bounds,
    statistics: Statistics,
}

impl TinSurface {
    /// Builds a surface using Delaunay triangulation of the XY projections.
    pub fn build<I, P>(points: I) -> Result<Self, TinError>
    where
        I: IntoIterator<Item = P>,
        P: Into<SurveyPoint>,
    {
        Self::build_with(points, &DelaunatorTriangulator)
    }

    /// Builds a surface with the provided triangulation backend.
    ///
    /// Non-finite samples are dropped first. Elevations never take part in
    /// the triangulation.
    pub fn build_with<I, P, T>(points: I, triangulator: &T) -> Result<Self, TinError>
    where
        I: IntoIterator<Item = P>,
        P: Into<SurveyPoint>,
        T: Triangulator + ?Sized,
    {
        let points = validate_points(points)?;
        let triangles = triangulate_points(&points, triangulator)?;
        let bounds = Bounds::from_points(&points);
        let statistics = Statistics::from_points(&points);
        log::info!(
            "built TIN with {} points and {} triangles",
            points.len(),
            triangles.len()
        );
        Ok(Self {
            points,
            triangles,
            bounds,
            statistics,
        })
    }

    pub fn points(&self) -> &[SurveyPoint] {
        &self.points
    }

    /// Triangles in the order produced by the triangulation backend.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Extracts contour polylines. See [`extract_contours`].
    pub fn contours(&self, options: &ContourOptions) -> ContourSet {
        extract_contours(self, options)
    }

    /// Interpolated elevation at `(x, y)`, or `None` outside the surface.
    pub fn elevation_at(&self, x: f64, y: f64) -> Option<f64> {
        interpolate_elevation(self, x, y)
    }

    /// Slope and aspect at `(x, y)`, or `None` outside the surface.
    pub fn slope_at(&self, x: f64, y: f64) -> Option<SlopeResult> {
        slope_at(self, x, y)
    }

    /// Triangle containing `(x, y)`.
    pub fn locate(&self, x: f64, y: f64) -> Option<&Triangle> {
        locate_triangle(self, x, y)
    }

    /// Returns the plane slope in degrees for each triangle, `None` for
    /// degenerate facets.
    pub fn triangle_slopes(&self) -> Vec<Option<f64>> {
        self.triangles
            .iter()
            .map(|t| t.unit_normal().map(|n| n.z.abs().min(1.0).acos().to_degrees()))
            .collect()
    }

    /// Total area of the triangles projected onto the XY plane.
    pub fn planar_area(&self) -> f64 {
        self.triangles.iter().map(Triangle::projected_area).sum()
    }

    /// Calculates the volume between the surface and a horizontal plane at
    /// `base_elev`. Parts of the surface below the plane count negatively.
    pub fn volume_to_elevation(&self, base_elev: f64) -> f64 {
        self.triangles
            .iter()
            .map(|t| t.projected_area() * (t.centroid().z - base_elev))
            .sum()
    }
}
