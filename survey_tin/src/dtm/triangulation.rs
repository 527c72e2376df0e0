use super::surface::Triangle;
use crate::error::TinError;
use crate::geometry::SurveyPoint;

/// Planar triangulation backend.
///
/// `coords` holds interleaved `x, y` pairs (two values per point). The result
/// is a flat list of point indices where each consecutive triple is one
/// consistently wound triangle.
pub trait Triangulator {
    fn triangulate(&self, coords: &[f64]) -> Result<Vec<usize>, TinError>;
}

/// Delaunay triangulation provided by the `delaunator` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunatorTriangulator;

impl Triangulator for DelaunatorTriangulator {
    fn triangulate(&self, coords: &[f64]) -> Result<Vec<usize>, TinError> {
        let points: Vec<delaunator::Point> = coords
            .chunks_exact(2)
            .map(|c| delaunator::Point { x: c[0], y: c[1] })
            .collect();
        Ok(delaunator::triangulate(&points).triangles)
    }
}

/// Delaunay triangulation provided by the `cdt` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CdtTriangulator;

impl Triangulator for CdtTriangulator {
    fn triangulate(&self, coords: &[f64]) -> Result<Vec<usize>, TinError> {
        let points: Vec<(f64, f64)> = coords.chunks_exact(2).map(|c| (c[0], c[1])).collect();
        let tris = cdt::triangulate_points(&points)
            .map_err(|e| TinError::Triangulation(format!("{e:?}")))?;
        Ok(tris.into_iter().flat_map(|t| [t.0, t.1, t.2]).collect())
    }
}

/// Runs `triangulator` on the XY projection of `points` and wraps each
/// returned index triple in a [`Triangle`] carrying copies of its vertices.
pub(crate) fn triangulate_points<T>(
    points: &[SurveyPoint],
    triangulator: &T,
) -> Result<Vec<Triangle>, TinError>
where
    T: Triangulator + ?Sized,
{
    let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    let indices = triangulator.triangulate(&coords)?;
    if indices.len() % 3 != 0 {
        log::warn!(
            "triangulation returned {} indices, ignoring the trailing partial triangle",
            indices.len()
        );
    }
    let mut triangles = Vec::with_capacity(indices.len() / 3);
    for chunk in indices.chunks_exact(3) {
        let [i0, i1, i2] = [chunk[0], chunk[1], chunk[2]];
        match (points.get(i0), points.get(i1), points.get(i2)) {
            (Some(&a), Some(&b), Some(&c)) => {
                triangles.push(Triangle::new(triangles.len(), [i0, i1, i2], [a, b, c]));
            }
            _ => log::warn!(
                "skipping triangle ({i0}, {i1}, {i2}) referencing a point outside 0..{}",
                points.len()
            ),
        }
    }
    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<usize>);

    impl Triangulator for Fixed {
        fn triangulate(&self, _coords: &[f64]) -> Result<Vec<usize>, TinError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl Triangulator for Failing {
        fn triangulate(&self, _coords: &[f64]) -> Result<Vec<usize>, TinError> {
            Err(TinError::Triangulation("no".into()))
        }
    }

    fn square() -> Vec<SurveyPoint> {
        vec![
            SurveyPoint::new(0.0, 0.0, 1.0),
            SurveyPoint::new(1.0, 0.0, 2.0),
            SurveyPoint::new(1.0, 1.0, 3.0),
            SurveyPoint::new(0.0, 1.0, 4.0),
        ]
    }

    #[test]
    fn delaunator_splits_square_in_two() {
        let coords = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let tris = DelaunatorTriangulator.triangulate(&coords).unwrap();
        assert_eq!(tris.len(), 6);
        assert!(tris.iter().all(|&i| i < 4));
    }

    #[test]
    fn cdt_splits_square_in_two() {
        let coords = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let tris = CdtTriangulator.triangulate(&coords).unwrap();
        assert_eq!(tris.len(), 6);
        assert!(tris.iter().all(|&i| i < 4));
    }

    #[test]
    fn delaunator_collinear_yields_nothing() {
        let coords = [0.0, 0.0, 1.0, 0.0, 2.0, 0.0];
        let tris = DelaunatorTriangulator.triangulate(&coords).unwrap();
        assert!(tris.is_empty());
    }

    #[test]
    fn triangles_cache_vertices_and_dense_ids() {
        let pts = square();
        let tris = triangulate_points(&pts, &Fixed(vec![0, 1, 2, 0, 2, 3])).unwrap();
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[0].id, 0);
        assert_eq!(tris[1].id, 1);
        assert_eq!(tris[1].indices, [0, 2, 3]);
        assert_eq!(tris[1].vertices, [pts[0], pts[2], pts[3]]);
    }

    #[test]
    fn out_of_range_and_partial_triples_are_skipped() {
        let pts = square();
        let tris = triangulate_points(&pts, &Fixed(vec![0, 1, 9, 0, 2, 3, 1, 2])).unwrap();
        assert_eq!(tris.len(), 1);
        assert_eq!(tris[0].id, 0);
        assert_eq!(tris[0].indices, [0, 2, 3]);
    }

    #[test]
    fn backend_failure_propagates() {
        let err = triangulate_points(&square(), &Failing).unwrap_err();
        assert_eq!(err, TinError::Triangulation("no".into()));
    }
}
