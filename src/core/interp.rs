//! Piecewise-linear interpolation over sampled 1-D data.
//!
//! Targets outside the sampled range are clamped to the boundary value, so the
//! result never extrapolates past the first or last sample.

/// Evaluate the piecewise-linear function through `(xp, fp)` at `x`.
///
/// `xp` must be non-decreasing and the same length as `fp`; callers check both.
/// Returns NaN for a NaN target or empty samples.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let (Some(&first), Some(&last)) = (xp.first(), xp.last()) else {
        return f64::NAN;
    };

    if x.is_nan() {
        return f64::NAN;
    }
    if x < first {
        return fp[0];
    }
    if x >= last {
        return fp[fp.len() - 1];
    }

    // xp[lo] <= x < xp[hi], lo is the last of any repeated nodes
    let hi = xp.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let span = xp[hi] - xp[lo];
    let t = (x - xp[lo]) / span;
    fp[lo] + t * (fp[hi] - fp[lo])
}

pub fn interp_all(xs: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| interp(x, xp, fp)).collect()
}

/// `n` evenly spaced values from `start` to `end`, both ends included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

pub fn is_ascending(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}
