use std::fmt;

use serde::{Deserialize, Serialize};

use super::surface::{TinSurface, Triangle};
use super::EPSILON;
use crate::geometry::SurveyPoint;

/// Eight-point compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassDirection {
    const OCTANTS: [Self; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    /// Nearest octant for a bearing in degrees clockwise from north.
    pub fn from_degrees(degrees: f64) -> Self {
        let idx = (degrees.rem_euclid(360.0) / 45.0).round() as usize % 8;
        Self::OCTANTS[idx]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Steepness and facing of the surface at a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopeResult {
    pub slope_degrees: f64,
    pub slope_percent: f64,
    /// Bearing of steepest descent in `[0, 360)`, clockwise from north
    /// (+Y). Flat facets report 0.
    pub aspect_degrees: f64,
    pub aspect_direction: CompassDirection,
}

impl SlopeResult {
    fn from_unit_normal(n: SurveyPoint) -> Self {
        let slope = n.z.abs().min(1.0).acos();
        // Downward facing normal: its horizontal part points downhill.
        let down = if n.z > 0.0 {
            SurveyPoint::new(-n.x, -n.y, -n.z)
        } else {
            n
        };
        let aspect = if down.x.hypot(down.y) < f64::EPSILON {
            0.0
        } else {
            let deg = (-down.x).atan2(-down.y).to_degrees().rem_euclid(360.0);
            if deg >= 360.0 {
                0.0
            } else {
                deg
            }
        };
        Self {
            slope_degrees: slope.to_degrees(),
            slope_percent: slope.tan() * 100.0,
            aspect_degrees: aspect,
            aspect_direction: CompassDirection::from_degrees(aspect),
        }
    }
}

/// Barycentric weights of `(x, y)` relative to the triangle's XY projection.
/// `None` when the projection has (near) zero area.
fn barycentric(tri: &Triangle, x: f64, y: f64) -> Option<[f64; 3]> {
    let [a, b, c] = tri.vertices;
    let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if det.abs() < EPSILON {
        return None;
    }
    let u = ((b.y - c.y) * (x - c.x) + (c.x - b.x) * (y - c.y)) / det;
    let v = ((c.y - a.y) * (x - c.x) + (a.x - c.x) * (y - c.y)) / det;
    Some([u, v, 1.0 - u - v])
}

/// Weights of `(x, y)` if the triangle contains it, edges included.
fn containing_weights(tri: &Triangle, x: f64, y: f64) -> Option<[f64; 3]> {
    barycentric(tri, x, y).filter(|w| w.iter().all(|&wi| wi >= -EPSILON))
}

/// First triangle whose projection contains `(x, y)`. Degenerate facets
/// are skipped.
pub fn locate_triangle(surface: &TinSurface, x: f64, y: f64) -> Option<&Triangle> {
    surface
        .triangles()
        .iter()
        .find(|tri| containing_weights(tri, x, y).is_some())
}

/// Linearly interpolated elevation at `(x, y)`.
///
/// Returns `None` when no triangle contains the location. On an edge shared
/// by two triangles either one may answer; both agree on the value.
pub fn interpolate_elevation(surface: &TinSurface, x: f64, y: f64) -> Option<f64> {
    surface.triangles().iter().find_map(|tri| {
        let [w0, w1, w2] = containing_weights(tri, x, y)?;
        let [a, b, c] = tri.vertices;
        Some(w0 * a.z + w1 * b.z + w2 * c.z)
    })
}

/// Slope and aspect of the facet containing `(x, y)`.
pub fn slope_at(surface: &TinSurface, x: f64, y: f64) -> Option<SlopeResult> {
    let tri = locate_triangle(surface, x, y)?;
    let normal = tri.unit_normal()?;
    Some(SlopeResult::from_unit_normal(normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtm::Triangulator;
    use crate::error::TinError;

    struct Fixed(Vec<usize>);

    impl Triangulator for Fixed {
        fn triangulate(&self, _coords: &[f64]) -> Result<Vec<usize>, TinError> {
            Ok(self.0.clone())
        }
    }

    fn tri(a: (f64, f64, f64), b: (f64, f64, f64), c: (f64, f64, f64)) -> Triangle {
        Triangle::new(0, [0, 1, 2], [a.into(), b.into(), c.into()])
    }

    #[test]
    fn weights_sum_to_one_and_hit_vertices() {
        let t = tri((0.0, 0.0, 0.0), (4.0, 0.0, 0.0), (0.0, 4.0, 0.0));
        let w = barycentric(&t, 1.0, 1.0).unwrap();
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(barycentric(&t, 4.0, 0.0).unwrap(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn containment_includes_edges() {
        let t = tri((0.0, 0.0, 0.0), (4.0, 0.0, 0.0), (0.0, 4.0, 0.0));
        assert!(containing_weights(&t, 2.0, 0.0).is_some());
        assert!(containing_weights(&t, 2.0, 2.0).is_some());
        assert!(containing_weights(&t, 2.0, -0.1).is_none());
        assert!(containing_weights(&t, 3.0, 3.0).is_none());
    }

    #[test]
    fn degenerate_projection_has_no_weights() {
        let t = tri((0.0, 0.0, 0.0), (1.0, 1.0, 5.0), (2.0, 2.0, 9.0));
        assert!(barycentric(&t, 1.0, 1.0).is_none());
    }

    #[test]
    fn interpolates_plane() {
        let tin = TinSurface::build(vec![
            (0.0, 0.0, 0.0),
            (10.0, 0.0, 10.0),
            (10.0, 10.0, 30.0),
            (0.0, 10.0, 20.0),
        ])
        .unwrap();
        let z = tin.elevation_at(2.5, 7.5).unwrap();
        assert!((z - 17.5).abs() < 1e-9);
        let z = tin.elevation_at(10.0, 5.0).unwrap();
        assert!((z - 20.0).abs() < 1e-9);
        assert_eq!(tin.elevation_at(-1.0, 5.0), None);
    }

    #[test]
    fn degenerate_facets_are_skipped_when_locating() {
        let pts = vec![
            (0.0, 0.0, 0.0),
            (5.0, 5.0, 1.0),
            (10.0, 10.0, 2.0),
            (10.0, 0.0, 3.0),
        ];
        let tin = TinSurface::build_with(pts, &Fixed(vec![0, 1, 2, 0, 3, 2])).unwrap();
        let found = tin.locate(7.0, 3.0).unwrap();
        assert_eq!(found.id, 1);
        assert!(tin.elevation_at(7.0, 3.0).is_some());
        assert_eq!(tin.locate(2.0, 8.0), None);
    }

    #[test]
    fn slope_of_plane_rising_east() {
        let tin = TinSurface::build(vec![
            (0.0, 0.0, 0.0),
            (10.0, 0.0, 10.0),
            (10.0, 10.0, 10.0),
            (0.0, 10.0, 0.0),
        ])
        .unwrap();
        let s = tin.slope_at(5.0, 5.0).unwrap();
        assert!((s.slope_degrees - 45.0).abs() < 1e-9);
        assert!((s.slope_percent - 100.0).abs() < 1e-6);
        assert!((s.aspect_degrees - 270.0).abs() < 1e-9);
        assert_eq!(s.aspect_direction, CompassDirection::W);
    }

    #[test]
    fn aspect_does_not_depend_on_winding() {
        let ccw = tri((0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (0.0, 10.0, 5.0));
        let cw = tri((0.0, 0.0, 0.0), (0.0, 10.0, 5.0), (10.0, 0.0, 0.0));
        let a = SlopeResult::from_unit_normal(ccw.unit_normal().unwrap());
        let b = SlopeResult::from_unit_normal(cw.unit_normal().unwrap());
        assert!((a.aspect_degrees - 180.0).abs() < 1e-9);
        assert!((b.aspect_degrees - 180.0).abs() < 1e-9);
        assert!((a.slope_degrees - b.slope_degrees).abs() < 1e-12);
    }

    #[test]
    fn flat_facet_faces_north() {
        let s = SlopeResult::from_unit_normal(SurveyPoint::new(0.0, -0.0, -1.0));
        assert_eq!(s.slope_degrees, 0.0);
        assert_eq!(s.aspect_degrees, 0.0);
        assert_eq!(s.aspect_direction, CompassDirection::N);
    }

    #[test]
    fn compass_octants() {
        use CompassDirection::*;
        assert_eq!(CompassDirection::from_degrees(0.0), N);
        assert_eq!(CompassDirection::from_degrees(22.4), N);
        assert_eq!(CompassDirection::from_degrees(22.6), NE);
        assert_eq!(CompassDirection::from_degrees(90.0), E);
        assert_eq!(CompassDirection::from_degrees(135.0), SE);
        assert_eq!(CompassDirection::from_degrees(180.0), S);
        assert_eq!(CompassDirection::from_degrees(225.0), SW);
        assert_eq!(CompassDirection::from_degrees(270.0), W);
        assert_eq!(CompassDirection::from_degrees(315.0), NW);
        assert_eq!(CompassDirection::from_degrees(337.6), N);
        assert_eq!(CompassDirection::from_degrees(359.9), N);
        assert_eq!(CompassDirection::from_degrees(-45.0), NW);
        assert_eq!(SW.to_string(), "SW");
    }
}
