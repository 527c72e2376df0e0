//! Error type shared by surface construction routines.

use thiserror::Error;

/// Failures raised while building a [`TinSurface`](crate::dtm::TinSurface).
///
/// Queries that find no data (a point outside the triangulated area, or a
/// degenerate facet) are not errors; they return `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TinError {
    /// Fewer than three finite points remained after validation.
    #[error("insufficient points: {found} valid point(s), at least 3 are required")]
    InsufficientPoints { found: usize },
    /// The triangulation backend rejected the input.
    #[error("triangulation failed: {0}")]
    Triangulation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = TinError::InsufficientPoints { found: 2 };
        assert_eq!(
            e.to_string(),
            "insufficient points: 2 valid point(s), at least 3 are required"
        );
        let e = TinError::Triangulation("collinear".into());
        assert_eq!(e.to_string(), "triangulation failed: collinear");
    }
}
