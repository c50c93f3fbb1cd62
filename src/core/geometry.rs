//! Split and merge of MSES closed-curve data.
//!
//! An MSES file starts at the trailing edge, runs forward along the upper
//! surface to the leading edge (x decreasing) and returns along the lower
//! surface (x increasing). The leading edge is the last point before x stops
//! decreasing.

use crate::core::interp::{interp_all, is_ascending};
use crate::domain::model::{Curve, LeadingEdgeDedup, Surface, SurfaceCurve, SurfacePair};
use crate::utils::error::{MsesError, Result};

/// Index of the leading edge in an MSES x sequence.
///
/// This is the smallest `i` with `x[i + 1] >= x[i]`, so a plateau at the
/// leading edge splits at its first point.
pub fn find_leading_edge(x: &[f64]) -> Result<usize> {
    if x.len() < 2 {
        return Err(MsesError::malformed(format!(
            "need at least 2 points, got {}",
            x.len()
        )));
    }
    if let Some(i) = x.iter().position(|v| !v.is_finite()) {
        return Err(MsesError::malformed(format!(
            "non-finite x-coordinate at index {}",
            i
        )));
    }

    match x.windows(2).position(|w| w[1] >= w[0]) {
        Some(0) => Err(MsesError::malformed(
            "x does not decrease from the trailing edge",
        )),
        Some(le) => Ok(le),
        None => Err(MsesError::malformed(
            "x decreases throughout; no leading edge found",
        )),
    }
}

/// Split `values` at a known leading edge.
///
/// Upper runs from the leading edge back to index 0, lower is everything after.
pub(crate) fn split_at_leading_edge<T: Clone>(values: &[T], le: usize) -> SurfacePair<Vec<T>> {
    let upper = values[..=le].iter().rev().cloned().collect();
    let lower = values[le + 1..].to_vec();
    SurfacePair::new(upper, lower)
}

/// Split any column that shares the ordering of `x` into upper and lower surfaces.
pub fn split_surfaces<T: Clone>(x: &[f64], values: &[T]) -> Result<SurfacePair<Vec<T>>> {
    if x.len() != values.len() {
        return Err(MsesError::length_mismatch(
            "split values",
            x.len(),
            values.len(),
        ));
    }
    let le = find_leading_edge(x)?;
    Ok(split_at_leading_edge(values, le))
}

/// Split `(xmses, ymses)` and resample each surface onto `xout`.
pub fn interpolate_surfaces(
    xout: &[f64],
    xmses: &[f64],
    ymses: &[f64],
) -> Result<SurfacePair<Vec<f64>>> {
    if xmses.len() != ymses.len() {
        return Err(MsesError::length_mismatch(
            "interpolation data",
            xmses.len(),
            ymses.len(),
        ));
    }

    let le = find_leading_edge(xmses)?;
    let xs = split_at_leading_edge(xmses, le);
    let ys = split_at_leading_edge(ymses, le);
    check_ascending(&xs)?;

    Ok(SurfacePair::new(
        interp_all(xout, &xs.upper, &ys.upper),
        interp_all(xout, &xs.lower, &ys.lower),
    ))
}

pub(crate) fn check_ascending(xs: &SurfacePair<Vec<f64>>) -> Result<()> {
    for surface in Surface::ALL {
        if !is_ascending(&xs[surface]) {
            return Err(MsesError::UnsortedSurface { surface });
        }
    }
    Ok(())
}

/// Rebuild the closed curve using the zero-ordinate leading edge rule.
pub fn merge_surfaces(lower: &SurfaceCurve, upper: &SurfaceCurve) -> Result<Curve> {
    merge_surfaces_with(lower, upper, LeadingEdgeDedup::ZeroOrdinate)
}

/// Rebuild the closed curve: upper surface reversed, then the lower surface.
///
/// The lower surface's first point is dropped when `dedup` says it repeats the
/// leading edge already held by the upper surface.
pub fn merge_surfaces_with(
    lower: &SurfaceCurve,
    upper: &SurfaceCurve,
    dedup: LeadingEdgeDedup,
) -> Result<Curve> {
    check_surface(lower, Surface::Lower)?;
    check_surface(upper, Surface::Upper)?;

    let skip = usize::from(dedup.applies((lower.x[0], lower.y[0]), (upper.x[0], upper.y[0])));
    if skip == 1 {
        tracing::debug!(x = lower.x[0], "Dropping duplicate leading edge point");
    }

    Ok(Curve::new(
        join_surfaces(&lower.x, &upper.x, skip),
        join_surfaces(&lower.y, &upper.y, skip),
    ))
}

fn check_surface(curve: &SurfaceCurve, surface: Surface) -> Result<()> {
    if curve.x.len() != curve.y.len() {
        return Err(MsesError::length_mismatch(
            format!("{} surface", surface),
            curve.x.len(),
            curve.y.len(),
        ));
    }
    if curve.is_empty() {
        return Err(MsesError::EmptySurface { surface });
    }
    Ok(())
}

pub(crate) fn join_surfaces(lower: &[f64], upper: &[f64], skip: usize) -> Vec<f64> {
    let mut joined = Vec::with_capacity(upper.len() + lower.len() - skip);
    joined.extend(upper.iter().rev());
    joined.extend_from_slice(&lower[skip..]);
    joined
}
