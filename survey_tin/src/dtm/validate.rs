use crate::error::TinError;
use crate::geometry::SurveyPoint;

/// Keeps the candidates whose coordinates and elevation are all finite.
///
/// Fails with [`TinError::InsufficientPoints`] when fewer than three points
/// survive. Collinearity is left to the triangulation backend.
pub fn validate_points<I, P>(candidates: I) -> Result<Vec<SurveyPoint>, TinError>
where
    I: IntoIterator<Item = P>,
    P: Into<SurveyPoint>,
{
    let mut total = 0usize;
    let valid: Vec<SurveyPoint> = candidates
        .into_iter()
        .map(Into::into)
        .inspect(|_| total += 1)
        .filter(SurveyPoint::is_finite)
        .collect();
    if valid.len() < total {
        log::debug!("dropped {} non-finite point(s)", total - valid.len());
    }
    if valid.len() < 3 {
        return Err(TinError::InsufficientPoints { found: valid.len() });
    }
    Ok(valid)
}
