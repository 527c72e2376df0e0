use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::surface::{TinSurface, Triangle};
use super::EPSILON;
use crate::geometry::{distance, Point, SurveyPoint};

/// Interval steps used when no contour interval is requested. Each entry is
/// `(largest elevation range, interval)`.
const AUTO_INTERVALS: [(f64, f64); 5] = [
    (5.0, 0.5),
    (20.0, 1.0),
    (50.0, 2.0),
    (100.0, 5.0),
    (500.0, 10.0),
];
const FALLBACK_INTERVAL: f64 = 20.0;

/// Parameters controlling contour generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourOptions {
    /// Vertical spacing between contours. Chosen from the elevation range
    /// when `None`.
    pub interval: Option<f64>,
    /// Lowest contour elevation considered. Defaults to the surface minimum.
    pub min_elevation: Option<f64>,
    /// Highest contour elevation considered. Defaults to the surface maximum.
    pub max_elevation: Option<f64>,
    /// Every n-th contour (counted from elevation zero) is major.
    pub major_interval: u32,
}

impl Default for ContourOptions {
    fn default() -> Self {
        Self {
            interval: None,
            min_elevation: None,
            max_elevation: None,
            major_interval: 5,
        }
    }
}

impl ContourOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: f64) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_min_elevation(mut self, min: f64) -> Self {
        self.min_elevation = Some(min);
        self
    }

    pub fn with_max_elevation(mut self, max: f64) -> Self {
        self.max_elevation = Some(max);
        self
    }

    pub fn with_major_interval(mut self, major_interval: u32) -> Self {
        self.major_interval = major_interval;
        self
    }
}

/// Elevation window used for a contour run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationRange {
    pub min: f64,
    pub max: f64,
}

/// Polyline connecting points of equal elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub id: usize,
    pub elevation: f64,
    pub is_major: bool,
    /// Ordered vertices, at least two.
    pub points: Vec<Point>,
}

impl Contour {
    /// Returns `true` when the polyline ends where it starts.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 2 => first.coincides(last, EPSILON),
            _ => false,
        }
    }

    /// Planar length of the polyline.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| distance(pair[0], pair[1]))
            .sum()
    }
}

/// Result of a contour extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourSet {
    pub interval: f64,
    pub major_interval: u32,
    pub elevation_range: ElevationRange,
    /// Contours in ascending elevation order.
    pub contours: Vec<Contour>,
}

impl ContourSet {
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn major_contours(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter().filter(|c| c.is_major)
    }

    pub fn minor_contours(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter().filter(|c| !c.is_major)
    }
}

/// Picks a contour interval for an elevation range.
pub fn auto_interval(range: f64) -> f64 {
    AUTO_INTERVALS
        .iter()
        .find(|(limit, _)| range <= *limit)
        .map(|&(_, interval)| interval)
        .unwrap_or(FALLBACK_INTERVAL)
}

/// Contour levels between `min` and `max` (inclusive).
///
/// Each level is computed as `k * interval` for an integer `k`, starting at
/// `ceil(min / interval)`, so levels never drift from the interval grid.
pub fn contour_elevations(min: f64, max: f64, interval: f64) -> Vec<f64> {
    if !(interval.is_finite() && interval > 0.0 && min.is_finite() && max.is_finite()) {
        return Vec::new();
    }
    let first = (min / interval).ceil() as i64;
    (first..)
        .map(|k| k as f64 * interval)
        .take_while(|&elevation| elevation <= max)
        .collect()
}

/// Generates contour polylines for `surface`.
///
/// A surface without triangles produces an empty set.
pub fn extract_contours(surface: &TinSurface, options: &ContourOptions) -> ContourSet {
    let stats = surface.statistics();
    let min = options.min_elevation.unwrap_or(stats.min_elevation);
    let max = options.max_elevation.unwrap_or(stats.max_elevation);
    let interval = match options.interval {
        Some(interval) if interval.is_finite() && interval > 0.0 => interval,
        Some(interval) => {
            log::warn!("ignoring contour interval {interval}, selecting one from the elevation range");
            auto_interval(max - min)
        }
        None => auto_interval(max - min),
    };

    let mut contours = Vec::new();
    if !surface.triangles().is_empty() {
        for level in contour_elevations(min, max, interval) {
            let segments: Vec<Segment> = surface
                .triangles()
                .iter()
                .filter_map(|tri| triangle_segment(tri, level))
                .collect();
            if segments.is_empty() {
                continue;
            }
            let lines = stitch_segments(&segments);
            log::debug!(
                "contour level {level}: {} segments, {} polylines",
                segments.len(),
                lines.len()
            );
            let major = is_major(level, interval, options.major_interval);
            for points in lines {
                contours.push(Contour {
                    id: contours.len(),
                    elevation: level,
                    is_major: major,
                    points,
                });
            }
        }
    }
    log::info!(
        "extracted {} contours at interval {interval} between {min} and {max}",
        contours.len()
    );

    ContourSet {
        interval,
        major_interval: options.major_interval,
        elevation_range: ElevationRange { min, max },
        contours,
    }
}

/// Piece of a contour crossing one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    start: SurveyPoint,
    end: SurveyPoint,
}

fn is_major(elevation: f64, interval: f64, major_interval: u32) -> bool {
    if major_interval == 0 {
        return false;
    }
    ((elevation / interval).round() as i64).rem_euclid(i64::from(major_interval)) == 0
}

/// Point where the edge `a -> b` crosses `level`.
///
/// Nearly flat edges and crossings within `EPSILON` of either end are
/// rejected, so a vertex lying on the level is never reported as a crossing.
fn edge_crossing(a: SurveyPoint, b: SurveyPoint, level: f64) -> Option<SurveyPoint> {
    if level < a.z.min(b.z) || level > a.z.max(b.z) {
        return None;
    }
    let dz = b.z - a.z;
    if dz.abs() < EPSILON {
        return None;
    }
    let t = (level - a.z) / dz;
    if t < EPSILON || t > 1.0 - EPSILON {
        return None;
    }
    Some(SurveyPoint::new(
        a.x + t * (b.x - a.x),
        a.y + t * (b.y - a.y),
        level,
    ))
}

/// Segment where `level` cuts the triangle. Only exactly two edge crossings
/// form a segment.
fn triangle_segment(tri: &Triangle, level: f64) -> Option<Segment> {
    let (lo, hi) = tri.z_range();
    if level < lo || level > hi {
        return None;
    }
    let [a, b, c] = tri.vertices;
    let crossings: Vec<SurveyPoint> = [(a, b), (b, c), (c, a)]
        .into_iter()
        .filter_map(|(p, q)| edge_crossing(p, q, level))
        .collect();
    match crossings.as_slice() {
        [start, end] => Some(Segment {
            start: *start,
            end: *end,
        }),
        _ => None,
    }
}

/// Finds an unused segment with an endpoint at `from` and returns its index
/// together with the opposite endpoint.
fn find_continuation(segments: &[Segment], used: &[bool], from: Point) -> Option<(usize, Point)> {
    segments
        .iter()
        .enumerate()
        .filter(|(i, _)| !used[*i])
        .find_map(|(i, seg)| {
            if seg.start.xy().coincides(&from, EPSILON) {
                Some((i, seg.end.xy()))
            } else if seg.end.xy().coincides(&from, EPSILON) {
                Some((i, seg.start.xy()))
            } else {
                None
            }
        })
}

/// Chains segments of a single level into polylines. Each chain grows from
/// its tail first and from its head once the tail is exhausted.
fn stitch_segments(segments: &[Segment]) -> Vec<Vec<Point>> {
    let mut used = vec![false; segments.len()];
    let mut lines = Vec::new();
    for seed in 0..segments.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;
        let mut line = VecDeque::from([segments[seed].start.xy(), segments[seed].end.xy()]);
        loop {
            let tail = line[line.len() - 1];
            if let Some((i, next)) = find_continuation(segments, &used, tail) {
                used[i] = true;
                line.push_back(next);
                continue;
            }
            let head = line[0];
            if let Some((i, prev)) = find_continuation(segments, &used, head) {
                used[i] = true;
                line.push_front(prev);
                continue;
            }
            break;
        }
        lines.push(Vec::from(line));
    }
    lines
}
