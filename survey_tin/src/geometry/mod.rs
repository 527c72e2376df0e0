//! Basic geometry primitives for surface computations.

mod point;
mod point3;

pub use point::Point;
pub use point3::SurveyPoint;

/// Calculates the Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Calculates the area of a simple polygon using the shoelace formula.
pub fn polygon_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let j = (i + 1) % vertices.len();
        sum += vertices[i].x * vertices[j].y - vertices[j].x * vertices[i].y;
    }
    sum.abs() * 0.5
}

pub(crate) fn subtract(a: SurveyPoint, b: SurveyPoint) -> SurveyPoint {
    SurveyPoint::new(a.x - b.x, a.y - b.y, a.z - b.z)
}

pub(crate) fn cross(a: SurveyPoint, b: SurveyPoint) -> SurveyPoint {
    SurveyPoint {
        x: a.y * b.z - a.z * b.y,
        y: a.z * b.x - a.x * b.z,
        z: a.x * b.y - a.y * b.x,
    }
}

pub(crate) fn norm(v: SurveyPoint) -> f64 {
    (v.x * v.x + v.y * v.y + v.z * v.z).sqrt()
}
